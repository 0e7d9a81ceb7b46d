//! Defines the command-line arguments and subcommands for the Gauntlet CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gauntlet",
    version,
    about = "A golden-output regression harness for the compiler467 toolchain."
)]
pub struct GauntletArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rebuild the compiler and run every fixture in one test directory.
    Suite {
        /// Directory holding the fixture files; goldens live in `prev/`
        /// beneath it unless overridden.
        #[arg(required = true)]
        test_dir: PathBuf,
        /// Path to the compiler executable under test.
        #[arg(long, default_value = "./compiler467")]
        compiler: PathBuf,
        /// Diagnostic mode flag passed before the fixture path (e.g. `-Tn`
        /// for scanner-only runs).
        #[arg(long, allow_hyphen_values = true)]
        mode_flag: Option<String>,
        /// Golden directory override.
        #[arg(long)]
        golden_dir: Option<PathBuf>,
        /// Comparison policy.
        #[arg(long, value_enum, default_value = "exact")]
        policy: PolicyArg,
        /// Name used in reports; defaults to the test directory name.
        #[arg(long)]
        suite_name: Option<String>,
        /// Build program run (clean, then build) before the suite.
        #[arg(long, default_value = "make")]
        make: PathBuf,
        /// Extra argument for the build action (repeatable), e.g.
        /// `--build-arg "CFLAGS=-g -O0 -Wall -DTEST_SCANNER"`.
        #[arg(long = "build-arg", allow_hyphen_values = true)]
        build_args: Vec<String>,
        /// Skip the clean and build steps entirely.
        #[arg(long)]
        no_build: bool,
        /// Kill a compiler run that exceeds this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Write a JSON summary of the suite to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Run every sub-suite in a session manifest and combine their totals.
    Session {
        /// YAML manifest listing the sub-suite commands in order.
        #[arg(required = true)]
        manifest: PathBuf,
        /// Write a JSON summary of the session to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// CLI-facing spelling of the comparison policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Whole-text equality.
    Exact,
    /// Line-indexed comparison reporting every differing line.
    Lines,
}
