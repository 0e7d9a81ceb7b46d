#![cfg(unix)]

//! End-to-end suite runs against a scripted compiler stand-in, staged in a
//! temp tree shaped like the real layout (`<dir>/*.c` + `<dir>/prev/*.c`).

mod common;

use assert_cmd::Command;
use common::{logging_cat_compiler, write_file, write_script};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn gauntlet() -> Command {
    Command::cargo_bin("gauntlet").expect("gauntlet binary should build")
}

#[test]
fn passing_suite_emits_the_success_marker() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("b_testing.c"), "int b;\nint bb;\n");
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    write_file(&tests.join("prev/b_testing.c"), "int b;\nint bb;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .assert()
        .success()
        .stdout(
            contains("a_testing.c:")
                .and(contains("    Passed."))
                .and(contains("Successful! Total Passed: 2")),
        );
}

#[test]
fn missing_golden_aborts_before_the_subject_runs() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("b_testing.c"), "int b;\n");
    // Only a_testing.c has a baseline.
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .assert()
        .code(2)
        .stdout(contains("a_testing.c:").and(contains("    Passed.")))
        .stderr(contains("b_testing.c").and(contains("cannot be found")));

    // The compiler ran for the goldened fixture but never for the new one.
    let invoked = fs::read_to_string(&log).expect("invocation log should exist");
    assert!(invoked.contains("a_testing.c"));
    assert!(!invoked.contains("b_testing.c"));
}

#[test]
fn regression_fails_fast_and_prints_the_diff_block() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "fine\n");
    write_file(&tests.join("b_testing.c"), "actual line\n");
    write_file(&tests.join("c_testing.c"), "never reached\n");
    write_file(&tests.join("prev/a_testing.c"), "fine\n");
    write_file(&tests.join("prev/b_testing.c"), "expected line\n");
    write_file(&tests.join("prev/c_testing.c"), "never reached\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .assert()
        .code(1)
        .stdout(
            contains("    Failed.")
                .and(contains("===== ACTUAL ====="))
                .and(contains("***** EXPECTED *****"))
                .and(contains("update the EXPECTED in")),
        )
        .stderr(contains("b_testing.c"));

    // Fail-fast: fixtures are visited in sorted order and c is never run.
    let invoked = fs::read_to_string(&log).expect("invocation log should exist");
    assert!(invoked.contains("a_testing.c"));
    assert!(invoked.contains("b_testing.c"));
    assert!(!invoked.contains("c_testing.c"));
}

#[test]
fn observed_output_is_stdout_then_stderr() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("lexer");
    write_file(&tests.join("streams_testing.c"), "ignored\n");
    // stderr is written first by the subject, but the golden records
    // stdout-then-stderr order.
    write_file(&tests.join("prev/streams_testing.c"), "to-stdout\nto-stderr\n");
    let compiler = write_script(
        temp.path(),
        "compiler467",
        "#!/bin/sh\nprintf 'to-stderr\\n' >&2\nprintf 'to-stdout\\n'\n",
    );

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .assert()
        .success()
        .stdout(contains("Successful! Total Passed: 1"));
}

#[test]
fn mode_flag_is_passed_before_the_fixture_path() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("lexer");
    write_file(&tests.join("tokens_testing.c"), "int x;\n");
    write_file(&tests.join("prev/tokens_testing.c"), "scanner mode\nint x;\n");
    let compiler = write_script(
        temp.path(),
        "compiler467",
        "#!/bin/sh\nif [ \"$1\" = \"-Tn\" ]; then echo 'scanner mode'; fi\ncat \"$2\"\n",
    );

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--mode-flag")
        .arg("-Tn")
        .arg("--no-build")
        .assert()
        .success()
        .stdout(contains("Successful! Total Passed: 1"));
}

#[test]
fn clean_step_error_output_is_fatal() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);
    // Exit code zero: stderr output alone must fail the clean step.
    let make = write_script(
        temp.path(),
        "make",
        "#!/bin/sh\nif [ \"$1\" = clean ]; then echo 'rm: cannot remove' >&2; fi\nexit 0\n",
    );

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--make")
        .arg(&make)
        .assert()
        .code(2)
        .stdout(contains("Rebuild:").and(contains("rm: cannot remove")))
        .stderr(contains("produced error output"));

    assert!(!log.exists(), "no subject may run after a failed clean");
}

#[test]
fn build_exit_status_is_fatal_but_warnings_are_not() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);

    // Warnings on build stderr: suite still runs.
    let warning_make = write_script(
        temp.path(),
        "make-warn",
        "#!/bin/sh\nif [ \"$1\" != clean ]; then echo 'warning: unused' >&2; fi\nexit 0\n",
    );
    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--make")
        .arg(&warning_make)
        .assert()
        .success()
        .stdout(contains("    clean.").and(contains("Successful! Total Passed: 1")));

    // Non-zero build exit: fatal setup error.
    let broken_make = write_script(
        temp.path(),
        "make-broken",
        "#!/bin/sh\nif [ \"$1\" = clean ]; then exit 0; fi\necho 'cc: error' >&2\nexit 2\n",
    );
    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--make")
        .arg(&broken_make)
        .assert()
        .code(2)
        .stderr(contains("build step"));
}

#[test]
fn build_args_reach_the_build_action() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("lexer");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);
    let make_log = temp.path().join("make.log");
    let make = write_script(
        temp.path(),
        "make",
        &format!("#!/bin/sh\nprintf '%s\\n' \"$*\" >> {}\n", make_log.display()),
    );

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--make")
        .arg(&make)
        .arg("--build-arg")
        .arg("CFLAGS=-g -O0 -Wall -DTEST_SCANNER")
        .assert()
        .success()
        .stdout(contains("Rebuild with CFLAGS=-g -O0 -Wall -DTEST_SCANNER:"));

    let invocations = fs::read_to_string(&make_log).expect("make log should exist");
    let mut lines = invocations.lines();
    assert_eq!(lines.next(), Some("clean"));
    assert_eq!(lines.next(), Some("CFLAGS=-g -O0 -Wall -DTEST_SCANNER"));
}

#[test]
fn hung_subject_is_killed_with_a_distinct_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("hang_testing.c"), "int a;\n");
    write_file(&tests.join("prev/hang_testing.c"), "int a;\n");
    let compiler = write_script(temp.path(), "compiler467", "#!/bin/sh\nexec sleep 30\n");

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .arg("--timeout-secs")
        .arg("1")
        .assert()
        .code(2)
        .stderr(contains("did not finish within 1s"));
}

#[test]
fn line_policy_reports_numbered_mismatches() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "line one\nline TWO\n");
    write_file(&tests.join("prev/a_testing.c"), "line one\nline two\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .arg("--policy")
        .arg("lines")
        .assert()
        .code(1)
        .stdout(
            contains("----- DIFF(a_testing.c) -----")
                .and(contains("Line: 2:"))
                .and(contains("E:line two"))
                .and(contains("A:line TWO")),
        );
}

#[test]
fn report_flag_writes_a_json_summary() {
    let temp = TempDir::new().expect("tempdir should be created");
    let tests = temp.path().join("semantic");
    write_file(&tests.join("a_testing.c"), "int a;\n");
    write_file(&tests.join("prev/a_testing.c"), "int a;\n");
    let log = temp.path().join("invoked.log");
    let compiler = logging_cat_compiler(temp.path(), &log);
    let report = temp.path().join("out/summary.json");

    gauntlet()
        .arg("suite")
        .arg(&tests)
        .arg("--compiler")
        .arg(&compiler)
        .arg("--no-build")
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report should be readable"))
            .expect("report JSON should parse");
    assert_eq!(parsed["suite"], serde_json::Value::from("semantic"));
    assert_eq!(parsed["passed"], serde_json::Value::from(1));
}
