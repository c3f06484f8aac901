//! End-to-end tests for the `bdd-audit` binary against a suite on disk.

#![expect(
    clippy::expect_used,
    reason = "tests fail loudly when the fixture suite cannot be built"
)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;

const FEATURE: &str = r#"@checkout
Feature: Checkout

  Background:
    Given a signed-in customer

  @smoke
  Scenario: pay by card
    When I pay 30 euro
    Then a receipt is printed

  Scenario Outline: pay in parts
    When I pay <amount> euro
    Then a receipt is printed

    Examples:
      | amount | notes  |
      | 10     | first  |
      | 20     | second |

  @wip
  Scenario: request a refund
    When I request a refund
"#;

const STEPS: &str = r#"//! Step definitions for checkout.

#[given("a signed-in customer")]
fn signed_in_customer() {}

#[when(r"I pay (\d+) euro")]
fn pay_euro() {}

#[then("a receipt is printed")]
fn receipt_printed() {}

#[then("a refund is queued")]
fn refund_queued() {}
"#;

fn write_suite(root: &Path) {
    let features = root.join("features");
    let steps = root.join("steps");
    fs::create_dir_all(&features).expect("create features dir");
    fs::create_dir_all(&steps).expect("create steps dir");
    fs::write(features.join("checkout.feature"), FEATURE).expect("write feature file");
    fs::write(steps.join("checkout_steps.rs"), STEPS).expect("write steps file");
}

fn audit(root: &Path, args: &[&str]) -> String {
    let output = Command::cargo_bin("bdd-audit")
        .expect("binary exists")
        .args(args)
        .arg("--features")
        .arg(root.join("features"))
        .arg("--steps")
        .arg(root.join("steps"))
        .output()
        .expect("runs");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("utf8")
}

#[test]
fn summary_reports_suite_counts() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["summary"]);
    assert!(stdout.contains("|Not implemented steps    |1|"));
    assert!(stdout.contains("|Tests                    |4|"));
}

#[test]
fn unimplemented_lists_the_unbound_step() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["unimplemented"]);
    assert!(stdout.contains("When I request a refund"));
    assert!(stdout.contains("checkout.feature"));
    assert!(!stdout.contains("I pay"));
}

#[test]
fn unused_lists_the_orphan_definition() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["unused"]);
    assert!(stdout.contains("a refund is queued"));
    assert!(stdout.contains("refund_queued"));
    assert!(!stdout.contains("signed_in_customer"));
}

#[test]
fn duplicates_group_parameter_variants() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["duplicates"]);
    assert!(stdout.contains("pay by card"));
    assert!(stdout.contains("pay in parts"));
    assert!(stdout.contains("ORIGIN"));
    assert!(stdout.contains("IGNORE PARAMETERS"));
    assert!(!stdout.contains("request a refund"));
}

#[test]
fn tag_filters_narrow_the_suite_before_reporting() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["summary", "--tags", "~@wip"]);
    assert!(stdout.contains("|Not implemented steps    |0|"));
    assert!(stdout.contains("|Tests                    |3|"));
}

#[test]
fn sequences_report_shared_runs() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["sequences"]);
    assert!(stdout.contains("used 2 times:"));
    assert!(stdout.contains(r"I pay (\d+) euro"));
    assert!(stdout.contains("a receipt is printed"));
}

#[test]
fn optimize_shows_original_and_slimmed_outline() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_suite(dir.path());

    let stdout = audit(dir.path(), &["optimize"]);
    assert!(stdout.contains("--- original"));
    assert!(stdout.contains("+++ optimised"));
    assert!(stdout.contains("Scenario Outline: pay in parts"));
    assert!(stdout.contains("notes"));
}

#[test]
fn missing_scan_root_fails_with_context() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let output = Command::cargo_bin("bdd-audit")
        .expect("binary exists")
        .arg("summary")
        .arg("--features")
        .arg(dir.path().join("nowhere"))
        .arg("--steps")
        .arg(dir.path().join("nowhere"))
        .output()
        .expect("runs");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("failed to scan features"));
}
