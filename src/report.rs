//! Console narration.
//!
//! All user-facing output goes through [`Reporter`]. The per-fixture
//! progress lines and the trailing success marker are part of the external
//! contract: a meta-session judges a suite solely by scraping this text, so
//! colors are disabled automatically when stdout is not a terminal.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compare::{CompareReport, DiffLine, MismatchDetail};
use crate::session::SessionReport;

/// Rendered in place of a line that one side of a comparison does not have.
const ABSENT_LINE: &str = "<absent>";

pub struct Reporter {
    stream: StandardStream,
}

impl Reporter {
    pub fn stdout() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stream: StandardStream::stdout(choice),
        }
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stream, "{text}");
    }

    fn colored_line(&mut self, text: &str, color: Color) {
        let _ = self.stream.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = writeln!(self.stream, "{text}");
        let _ = self.stream.reset();
    }

    // ------------------------------------------------------------------
    // Build narration
    // ------------------------------------------------------------------

    pub fn build_header(&mut self, build_args: &[String]) {
        if build_args.is_empty() {
            self.line("Rebuild:");
        } else {
            self.line(&format!("Rebuild with {}:", build_args.join(" ")));
        }
    }

    pub fn step_done(&mut self, step: &str) {
        self.line(&format!("    {step}."));
    }

    /// Echoes both captured streams of a failed build action.
    pub fn captured_streams(&mut self, stdout: &str, stderr: &str) {
        if !stdout.is_empty() {
            self.line(stdout.trim_end_matches('\n'));
        }
        if !stderr.is_empty() {
            self.line(stderr.trim_end_matches('\n'));
        }
    }

    // ------------------------------------------------------------------
    // Per-fixture narration
    // ------------------------------------------------------------------

    pub fn fixture_start(&mut self, name: &str) {
        self.line(&format!("{name}:"));
    }

    pub fn fixture_passed(&mut self) {
        self.colored_line("    Passed.", Color::Green);
    }

    pub fn fixture_failed(&mut self) {
        self.colored_line("    Failed.", Color::Red);
    }

    /// The full diagnostic block for a failed comparison: both texts,
    /// bordered, followed by the policy-specific diff and the operator hint
    /// naming the golden record to update.
    pub fn mismatch(&mut self, fixture: &str, report: &CompareReport, golden_path: &Path) {
        self.line("    DIFF");
        self.line("===== ACTUAL =====");
        self.line(report.actual.trim_end_matches('\n'));
        self.line("==================");
        self.line("***** EXPECTED *****");
        self.line(report.expected.trim_end_matches('\n'));
        self.line("********************");
        match &report.detail {
            MismatchDetail::Unified { diff } => {
                self.line("----- DIFF -----");
                self.unified(diff);
            }
            MismatchDetail::Lines { mismatches } => {
                self.line(&format!("----- DIFF({fixture}) -----"));
                for m in mismatches {
                    self.line(&format!("Line: {}:", m.line));
                    let expected = m.expected.as_deref().unwrap_or(ABSENT_LINE);
                    let actual = m.actual.as_deref().unwrap_or(ABSENT_LINE);
                    self.colored_line(&format!("E:{expected}"), Color::Green);
                    self.colored_line(&format!("A:{actual}"), Color::Red);
                }
            }
        }
        self.line("----------------");
        self.line("");
        self.line(&format!(
            "There are probably some bugs with the compiler, or update the EXPECTED in {}!",
            golden_path.display()
        ));
    }

    fn unified(&mut self, diff: &[DiffLine]) {
        for line in diff {
            match line {
                DiffLine::Same(text) => self.line(&format!(" {text}")),
                DiffLine::Add(text) => self.colored_line(&format!("+{text}"), Color::Green),
                DiffLine::Rem(text) => self.colored_line(&format!("-{text}"), Color::Red),
            }
        }
    }

    // ------------------------------------------------------------------
    // Suite and session summaries
    // ------------------------------------------------------------------

    /// The machine-parseable success marker. Emitted only when every fixture
    /// in the suite passed; its exact wording is the inter-process contract.
    pub fn suite_marker(&mut self, passed: usize) {
        self.line("##########");
        self.line(&format!("Successful! Total Passed: {passed}"));
    }

    pub fn subsuite_header(&mut self, name: &str) {
        self.line(&format!("========== {name} =========="));
    }

    /// Echo-through of a sub-suite's combined output.
    pub fn subsuite_output(&mut self, text: &str) {
        if !text.is_empty() {
            self.line(text.trim_end_matches('\n'));
        }
    }

    pub fn subsuite_spawn_failure(&mut self, command: &str, err: &std::io::Error) {
        self.line(&format!("    failed to run `{command}`: {err}"));
    }

    pub fn session_summary(&mut self, report: &SessionReport) {
        self.line("==========");
        for suite in &report.suites {
            match suite.passed {
                Some(_) => self.colored_line(&format!("{} Passed!", suite.name), Color::Green),
                None => self.colored_line(&format!("{} Failed!", suite.name), Color::Red),
            }
        }
        self.line(&format!("Total Passed: {}", report.total_passed));
    }
}
