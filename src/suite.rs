//! One directory's worth of fixtures run under one mode/policy combination.
//!
//! The suite is fail-fast by contract: a compiler bug invalidates confidence
//! in the remainder of the run, so the first failed verdict aborts the whole
//! suite after printing its diagnostic. Fail-fast is modeled as a typed
//! `Result` propagated by early return, never as panic-style control flow.

use std::path::PathBuf;

use serde::Serialize;
use walkdir::WalkDir;

use crate::build::BuildController;
use crate::compare::{compare, Verdict};
use crate::config::SuiteConfig;
use crate::diagnostics::{HarnessError, Result};
use crate::golden::GoldenStore;
use crate::report::Reporter;
use crate::subject::SubjectRunner;

/// Aggregate result of a full suite walk. Only reachable when every fixture
/// passed, because of the fail-fast abort.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    pub suite: String,
    pub passed: usize,
}

pub struct SuiteRunner {
    config: SuiteConfig,
}

impl SuiteRunner {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, reporter: &mut Reporter) -> Result<SuiteSummary> {
        // Build once per suite, not per fixture: every fixture observes the
        // same on-disk compiler artifact.
        if let Some(build) = &self.config.build {
            BuildController::new(build.clone()).prepare(reporter)?;
        }

        let golden = GoldenStore::new(&self.config.golden_dir);
        let subject = SubjectRunner::new(
            &self.config.compiler,
            self.config.mode_flag.clone(),
            self.config.timeout,
        );

        let mut passed = 0usize;
        for path in self.enumerate_fixtures()? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            reporter.fixture_start(&name);

            // Baseline presence is checked before the subject is ever run,
            // so a new un-golden fixture never reaches the compiler.
            golden.require(&name)?;

            let observed = subject.run(&path)?;
            if observed.truncated {
                reporter.line("    (observed output truncated at the capture limit)");
            }
            let expected = golden.load(&name)?;

            match compare(&observed.text, &expected, self.config.policy) {
                Verdict::Passed => {
                    reporter.fixture_passed();
                    passed += 1;
                }
                Verdict::Failed(diff) => {
                    reporter.fixture_failed();
                    reporter.mismatch(&name, &diff, &golden.record_path(&name));
                    return Err(HarnessError::Regression {
                        fixture: name,
                        prev_dir: golden.dir().display().to_string(),
                    });
                }
            }
        }

        reporter.suite_marker(passed);
        Ok(SuiteSummary {
            suite: self.config.name.clone(),
            passed,
        })
    }

    /// Immediate children of the test directory only, files only, sorted by
    /// file name for deterministic order. The golden subdirectory (and any
    /// other directory) is never a fixture.
    fn enumerate_fixtures(&self) -> Result<Vec<PathBuf>> {
        if !self.config.test_dir.is_dir() {
            return Err(HarnessError::InvalidSuite {
                dir: self.config.test_dir.clone(),
                reason: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.config.test_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| HarnessError::InvalidSuite {
                dir: self.config.test_dir.clone(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}
