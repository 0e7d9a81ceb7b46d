//! Output comparison policies.
//!
//! A suite picks one of two equality policies. `Exact` matches the whole
//! observed text against the golden record byte for byte and carries an
//! LCS-based line diff on mismatch. `Lines` walks both texts with a 1-based
//! line counter and records every differing position, not just the first.
//! `compare` is a pure function; all printing happens in the reporter.

use difference::{Changeset, Difference};

/// How observed output is matched against a golden record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Whole-text equality, trailing newline included.
    Exact,
    /// Line-by-line comparison reporting every differing position.
    Lines,
}

/// Result of matching one observed output against its golden record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed(CompareReport),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// Diagnostic payload for a failed comparison. Carries both full texts so
/// the reporter can print the bordered ACTUAL/EXPECTED blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareReport {
    pub expected: String,
    pub actual: String,
    pub detail: MismatchDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchDetail {
    /// Line-oriented LCS diff of the two whole texts.
    Unified { diff: Vec<DiffLine> },
    /// Every differing 1-based line position.
    Lines { mismatches: Vec<LineMismatch> },
}

/// One line of a unified diff, expected text on the `Rem` side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Same(String),
    Add(String),
    Rem(String),
}

/// A single differing position; `None` marks a line absent on that side
/// (the texts differ in line count at and past this position).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMismatch {
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

pub fn compare(observed: &str, golden: &str, policy: Policy) -> Verdict {
    match policy {
        Policy::Exact => compare_exact(observed, golden),
        Policy::Lines => compare_lines(observed, golden),
    }
}

fn compare_exact(observed: &str, golden: &str) -> Verdict {
    if observed == golden {
        return Verdict::Passed;
    }
    Verdict::Failed(CompareReport {
        expected: golden.to_string(),
        actual: observed.to_string(),
        detail: MismatchDetail::Unified {
            diff: unified_diff(golden, observed),
        },
    })
}

fn compare_lines(observed: &str, golden: &str) -> Verdict {
    let actual: Vec<&str> = observed.lines().collect();
    let expected: Vec<&str> = golden.lines().collect();

    // Scan to the longer of the two; a position past either end compares
    // against an absent line instead of indexing out of range, so a line
    // count difference always surfaces as at least one mismatch.
    let positions = actual.len().max(expected.len());
    let mut mismatches = Vec::new();
    for idx in 0..positions {
        let exp = expected.get(idx).copied();
        let act = actual.get(idx).copied();
        if exp != act {
            mismatches.push(LineMismatch {
                line: idx + 1,
                expected: exp.map(str::to_owned),
                actual: act.map(str::to_owned),
            });
        }
    }

    if mismatches.is_empty() {
        Verdict::Passed
    } else {
        Verdict::Failed(CompareReport {
            expected: golden.to_string(),
            actual: observed.to_string(),
            detail: MismatchDetail::Lines { mismatches },
        })
    }
}

/// Line-granular LCS diff via `difference::Changeset`.
fn unified_diff(expected: &str, actual: &str) -> Vec<DiffLine> {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = Vec::new();
    for diff in changeset.diffs {
        match diff {
            Difference::Same(chunk) => {
                out.extend(chunk.lines().map(|l| DiffLine::Same(l.to_string())));
            }
            Difference::Add(chunk) => {
                out.extend(chunk.lines().map(|l| DiffLine::Add(l.to_string())));
            }
            Difference::Rem(chunk) => {
                out.extend(chunk.lines().map(|l| DiffLine::Rem(l.to_string())));
            }
        }
    }
    out
}
