//! Harness configuration.
//!
//! Every component receives an explicit configuration value constructed at
//! the CLI boundary; nothing reads ambient globals. The session manifest is
//! the only file-based configuration and is plain YAML.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::compare::Policy;
use crate::diagnostics::{HarnessError, Result};

/// Name of the golden subdirectory beneath each test-category directory.
/// The layout is part of the external contract.
pub const GOLDEN_DIR_NAME: &str = "prev";

/// Clean-then-build actions run once before any subject run in a suite.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Build program, usually `make`.
    pub program: PathBuf,
    pub clean_args: Vec<String>,
    /// Extra arguments for the build action, e.g. a stage-specific
    /// `CFLAGS=… -DTEST_SCANNER` instrumentation define.
    pub build_args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("make"),
            clean_args: vec!["clean".to_string()],
            build_args: Vec::new(),
            cwd: None,
        }
    }
}

/// One directory's worth of fixtures under one mode/policy combination.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Name used in narration and reports.
    pub name: String,
    pub test_dir: PathBuf,
    pub golden_dir: PathBuf,
    /// The compiler executable under test.
    pub compiler: PathBuf,
    /// Diagnostic mode flag passed before the fixture path (e.g. `-Tn` for
    /// scanner-only runs); omitted for full-pipeline suites.
    pub mode_flag: Option<String>,
    pub policy: Policy,
    /// `None` skips the rebuild (pre-built subject).
    pub build: Option<BuildConfig>,
    /// Bounded wait for each subject run; unbounded when `None`.
    pub timeout: Option<Duration>,
}

impl SuiteConfig {
    pub fn new(test_dir: impl Into<PathBuf>, compiler: impl Into<PathBuf>) -> Self {
        let test_dir = test_dir.into();
        let name = test_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| test_dir.display().to_string());
        let golden_dir = test_dir.join(GOLDEN_DIR_NAME);
        Self {
            name,
            test_dir,
            golden_dir,
            compiler: compiler.into(),
            mode_flag: None,
            policy: Policy::Exact,
            build: Some(BuildConfig::default()),
            timeout: None,
        }
    }
}

/// One sub-suite entry in a session manifest: a named command spawned as an
/// independent process and judged solely by its printed success marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubSuiteSpec {
    pub name: String,
    /// Argv vector, program first.
    pub command: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Ordered list of sub-suites composing one session.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    pub suites: Vec<SubSuiteSpec>,
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| HarnessError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}
