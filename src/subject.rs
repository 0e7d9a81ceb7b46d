//! Runs the compiler under test.
//!
//! One invocation per fixture, no retry: the subject is spawned with exactly
//! `[mode_flag?] <fixture_path>` as arguments and its captured stdout is
//! concatenated with its captured stderr, in that order. The subject's exit
//! code is deliberately ignored; only the combined text is compared.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::diagnostics::{HarnessError, Result};
use crate::exec::{self, CaptureLimits, CommandSpec};

/// Ephemeral combined output of one subject invocation, stdout first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedOutput {
    pub text: String,
    /// The per-stream capture cap was hit; the comparison will almost
    /// certainly fail, but the truncation is worth surfacing.
    pub truncated: bool,
}

pub struct SubjectRunner {
    compiler: PathBuf,
    mode_flag: Option<String>,
    timeout: Option<Duration>,
}

impl SubjectRunner {
    pub fn new(
        compiler: impl Into<PathBuf>,
        mode_flag: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            compiler: compiler.into(),
            mode_flag,
            timeout,
        }
    }

    pub fn run(&self, fixture_path: &Path) -> Result<ObservedOutput> {
        let mut args = Vec::new();
        if let Some(flag) = &self.mode_flag {
            args.push(flag.clone());
        }
        args.push(fixture_path.display().to_string());

        let spec = CommandSpec::new(&self.compiler, args);
        let limits = CaptureLimits::with_timeout(self.timeout);
        let captured = exec::capture(&spec, &limits).map_err(|source| HarnessError::Spawn {
            command: spec.to_string(),
            source,
        })?;

        if captured.timed_out {
            return Err(HarnessError::SubjectTimedOut {
                fixture: fixture_name(fixture_path),
                // timed_out implies a configured timeout
                seconds: self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            });
        }

        Ok(ObservedOutput {
            text: captured.combined(),
            truncated: captured.truncated,
        })
    }
}

fn fixture_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
