//! The golden record store.
//!
//! An on-disk mapping from fixture file name to its expected combined-output
//! text, rooted at the `prev/` subdirectory of a test-category directory.
//! Read-only from the harness's perspective: golden files are authored by a
//! human or a trusted first run, never written here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{HarnessError, Result};

#[derive(Debug, Clone)]
pub struct GoldenStore {
    dir: PathBuf,
}

impl GoldenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, fixture: &str) -> PathBuf {
        self.dir.join(fixture)
    }

    pub fn contains(&self, fixture: &str) -> bool {
        self.record_path(fixture).is_file()
    }

    /// Every fixture must have exactly one record with the same file name;
    /// a missing one fails the suite as a setup error before the subject is
    /// ever run against that fixture.
    pub fn require(&self, fixture: &str) -> Result<()> {
        if self.contains(fixture) {
            Ok(())
        } else {
            Err(HarnessError::MissingGolden {
                fixture: fixture.to_string(),
                prev_dir: self.dir.display().to_string(),
            })
        }
    }

    pub fn load(&self, fixture: &str) -> Result<String> {
        self.require(fixture)?;
        let path = self.record_path(fixture);
        fs::read_to_string(&path).map_err(|source| HarnessError::Io { path, source })
    }
}
