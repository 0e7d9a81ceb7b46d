//! Harness-wide error taxonomy.
//!
//! Two families matter operationally: setup errors (broken preconditions
//! such as a failing clean step or a fixture with no recorded baseline) and
//! regressions (the subject's output no longer matches its golden record).
//! Both abort the suite process; the CLI boundary renders them as `miette`
//! reports and maps them to distinct exit codes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The clean action wrote to its error stream. Treated as unconditional
    /// failure regardless of exit code; nothing can be trusted after it.
    #[error("clean step `{command}` produced error output")]
    #[diagnostic(
        code(gauntlet::build::clean),
        help("fix the clean action before running any tests")
    )]
    CleanFailed { command: String },

    #[error("build step `{command}` exited with {status}")]
    #[diagnostic(
        code(gauntlet::build::failed),
        help("the subject cannot be tested without a successful build")
    )]
    BuildFailed { command: String, status: String },

    /// A fixture with no baseline is a setup error, never a regression and
    /// never a silent skip.
    #[error("`{fixture}` cannot be found in {prev_dir}")]
    #[diagnostic(
        code(gauntlet::golden::missing),
        help("maybe it is a new test; consider adding the expected output to {prev_dir}")
    )]
    MissingGolden { fixture: String, prev_dir: String },

    #[error("test directory {dir:?} is not usable: {reason}")]
    #[diagnostic(code(gauntlet::suite::invalid))]
    InvalidSuite { dir: PathBuf, reason: String },

    /// The diff diagnostic has already been printed when this is raised; the
    /// error itself only names the offending fixture.
    #[error("`{fixture}` failed to produce the same output as expected")]
    #[diagnostic(
        code(gauntlet::verdict::regression),
        help("either the compiler regressed or the golden record in {prev_dir} needs updating")
    )]
    Regression { fixture: String, prev_dir: String },

    #[error("`{fixture}` did not finish within {seconds}s")]
    #[diagnostic(code(gauntlet::subject::timeout))]
    SubjectTimedOut { fixture: String, seconds: u64 },

    #[error("failed to run `{command}`")]
    #[diagnostic(code(gauntlet::exec::spawn))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error on {path:?}")]
    #[diagnostic(code(gauntlet::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session manifest {path:?}")]
    #[diagnostic(code(gauntlet::session::manifest))]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write report {path:?}")]
    #[diagnostic(code(gauntlet::report::write))]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Setup errors are every fatal condition that is not the subject
    /// regressing; the CLI maps the two families to different exit codes.
    pub fn is_regression(&self) -> bool {
        matches!(self, HarnessError::Regression { .. })
    }
}
