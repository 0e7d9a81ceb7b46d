//! Pre-run rebuild of the subject.
//!
//! A clean action followed by a build action, run once per suite before any
//! subject run, so every fixture in the suite observes the same build. The
//! clean step is judged by its error stream: any stderr output is an
//! unconditional fatal setup error regardless of exit code. The build step
//! is judged by its exit status alone; warnings on stderr do not fail it.

use crate::config::BuildConfig;
use crate::diagnostics::{HarnessError, Result};
use crate::exec::{self, CaptureLimits, CommandSpec};
use crate::report::Reporter;

pub struct BuildController {
    config: BuildConfig,
}

impl BuildController {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Mutates the on-disk compiler artifact used by every subsequent
    /// subject run in the session.
    pub fn prepare(&self, reporter: &mut Reporter) -> Result<()> {
        reporter.build_header(&self.config.build_args);
        self.clean(reporter)?;
        self.build(reporter)
    }

    fn clean(&self, reporter: &mut Reporter) -> Result<()> {
        let spec = self.spec(self.config.clean_args.clone());
        let captured =
            exec::capture(&spec, &CaptureLimits::default()).map_err(|source| {
                HarnessError::Spawn {
                    command: spec.to_string(),
                    source,
                }
            })?;

        if !captured.stderr.is_empty() {
            reporter.captured_streams(&captured.stdout, &captured.stderr);
            return Err(HarnessError::CleanFailed {
                command: spec.to_string(),
            });
        }
        reporter.step_done("clean");
        Ok(())
    }

    fn build(&self, reporter: &mut Reporter) -> Result<()> {
        let spec = self.spec(self.config.build_args.clone());
        let captured =
            exec::capture(&spec, &CaptureLimits::default()).map_err(|source| {
                HarnessError::Spawn {
                    command: spec.to_string(),
                    source,
                }
            })?;

        if !captured.status.success() {
            reporter.captured_streams(&captured.stdout, &captured.stderr);
            return Err(HarnessError::BuildFailed {
                command: spec.to_string(),
                status: captured.status.to_string(),
            });
        }
        let step = self
            .config
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "build".to_string());
        reporter.step_done(&step);
        Ok(())
    }

    fn spec(&self, args: Vec<String>) -> CommandSpec {
        let spec = CommandSpec::new(&self.config.program, args);
        match &self.config.cwd {
            Some(cwd) => spec.with_cwd(cwd),
            None => spec,
        }
    }
}
