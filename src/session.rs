//! Composes independently-run sub-suites into one session report.
//!
//! Each sub-suite is an opaque command spawned as its own process. The only
//! signal of success is the textual marker `Successful! Total Passed: <n>`
//! somewhere in its combined output; wrong wording, a crash before printing,
//! or a spawn failure are all indistinguishable from a failed sub-suite.
//! Unlike a suite, the session never fails fast: every sub-suite runs and
//! the session always produces a complete summary.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{SessionConfig, SubSuiteSpec};
use crate::exec::{self, CaptureLimits, CommandSpec};
use crate::report::Reporter;

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Successful! Total Passed: (\d+)").unwrap());

/// Extracts the count from a sub-suite's success marker, if present.
pub fn parse_total(output: &str) -> Option<u64> {
    MARKER
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
}

/// One sub-suite reduced to its name and passed count; `None` means the
/// marker was absent and the sub-suite is counted as failed.
#[derive(Debug, Clone, Serialize)]
pub struct SubSuiteOutcome {
    pub name: String,
    pub passed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub suites: Vec<SubSuiteOutcome>,
    pub total_passed: u64,
}

impl SessionReport {
    pub fn all_passed(&self) -> bool {
        self.suites.iter().all(|s| s.passed.is_some())
    }
}

pub struct SessionRunner {
    config: SessionConfig,
}

impl SessionRunner {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Never fails: a sub-suite that cannot be spawned or prints no marker
    /// is recorded as failed and the session moves on to its siblings.
    pub fn run(&self, reporter: &mut Reporter) -> SessionReport {
        let mut suites = Vec::with_capacity(self.config.suites.len());
        let mut total_passed = 0u64;

        for spec in &self.config.suites {
            reporter.subsuite_header(&spec.name);
            let outcome = run_sub_suite(spec, reporter);
            if let Some(count) = outcome.passed {
                total_passed += count;
            }
            suites.push(outcome);
        }

        let report = SessionReport {
            suites,
            total_passed,
        };
        reporter.session_summary(&report);
        report
    }
}

fn run_sub_suite(spec: &SubSuiteSpec, reporter: &mut Reporter) -> SubSuiteOutcome {
    let Some((program, args)) = spec.command.split_first() else {
        reporter.line("    (empty sub-suite command)");
        return SubSuiteOutcome {
            name: spec.name.clone(),
            passed: None,
        };
    };

    let mut command = CommandSpec::new(program, args.to_vec());
    if let Some(cwd) = &spec.cwd {
        command = command.with_cwd(cwd);
    }
    let limits = CaptureLimits::with_timeout(spec.timeout_secs.map(Duration::from_secs));

    let passed = match exec::capture(&command, &limits) {
        Ok(captured) => {
            let combined = captured.combined();
            reporter.subsuite_output(&combined);
            parse_total(&combined)
        }
        Err(err) => {
            reporter.subsuite_spawn_failure(&command.to_string(), &err);
            None
        }
    };

    SubSuiteOutcome {
        name: spec.name.clone(),
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_with_count() {
        let output = "stuff before\n##########\nSuccessful! Total Passed: 42\ntrailing";
        assert_eq!(parse_total(output), Some(42));
    }

    #[test]
    fn missing_marker_is_none() {
        assert_eq!(parse_total("no marker here"), None);
    }

    #[test]
    fn wrong_wording_is_none() {
        // The marker is exact; near-misses count as failure.
        assert_eq!(parse_total("successful! total passed: 42"), None);
        assert_eq!(parse_total("Successful! Total Passed:"), None);
    }

    #[test]
    fn all_passed_requires_every_marker() {
        let report = SessionReport {
            suites: vec![
                SubSuiteOutcome {
                    name: "a".into(),
                    passed: Some(3),
                },
                SubSuiteOutcome {
                    name: "b".into(),
                    passed: None,
                },
            ],
            total_passed: 3,
        };
        assert!(!report.all_passed());
    }
}
