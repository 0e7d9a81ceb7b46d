//! The Gauntlet command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library components. Exit behavior is part of the external contract:
//! a suite aborts non-zero on any setup error or regression, while a session
//! always completes and exits zero, reporting failures only in its summary.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use crate::cli::args::{Command, GauntletArgs, PolicyArg};
use crate::compare::Policy;
use crate::config::{BuildConfig, SessionConfig, SuiteConfig};
use crate::diagnostics::{HarnessError, Result};
use crate::report::Reporter;
use crate::session::SessionRunner;
use crate::suite::SuiteRunner;

pub mod args;

/// A regression means the compiler broke; a setup error means the harness
/// inputs are broken. CI can tell the two apart by exit code.
const EXIT_REGRESSION: i32 = 1;
const EXIT_SETUP: i32 = 2;

/// The main entry point for the CLI.
pub fn run() {
    let args = GauntletArgs::parse();
    let mut reporter = Reporter::stdout();

    match args.command {
        Command::Suite {
            test_dir,
            compiler,
            mode_flag,
            golden_dir,
            policy,
            suite_name,
            make,
            build_args,
            no_build,
            timeout_secs,
            report,
        } => {
            let mut config = SuiteConfig::new(test_dir, compiler);
            config.mode_flag = mode_flag;
            if let Some(dir) = golden_dir {
                config.golden_dir = dir;
            }
            if let Some(name) = suite_name {
                config.name = name;
            }
            config.policy = match policy {
                PolicyArg::Exact => Policy::Exact,
                PolicyArg::Lines => Policy::Lines,
            };
            config.build = if no_build {
                None
            } else {
                Some(BuildConfig {
                    program: make,
                    build_args,
                    ..BuildConfig::default()
                })
            };
            config.timeout = timeout_secs.map(Duration::from_secs);

            let result = SuiteRunner::new(config).run(&mut reporter).and_then(
                |summary| match &report {
                    Some(path) => write_json(path, &summary),
                    None => Ok(()),
                },
            );
            if let Err(err) = result {
                abort(err);
            }
        }
        Command::Session { manifest, report } => {
            // An unreadable manifest means the session cannot even start;
            // only sub-suite outcomes are exempt from aborting.
            let config = match SessionConfig::load(&manifest) {
                Ok(config) => config,
                Err(err) => abort(err),
            };
            let session_report = SessionRunner::new(config).run(&mut reporter);
            if let Some(path) = report {
                // The session still exits zero; the side channel is advisory.
                if let Err(err) = write_json(&path, &session_report) {
                    eprintln!("warning: {err}");
                }
            }
        }
    }
}

fn abort(err: HarnessError) -> ! {
    let code = if err.is_regression() {
        EXIT_REGRESSION
    } else {
        EXIT_SETUP
    };
    eprintln!("{:?}", miette::Report::new(err));
    process::exit(code);
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source| HarnessError::Report {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| HarnessError::Report {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    fs::write(path, json).map_err(io_err)
}
