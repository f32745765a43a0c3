//! Integration tests for the dbready CLI.
//!
//! These tests verify the automation contract (exit code 0 only when the
//! database is ready and up to date) and the scaffolding workflow. None of
//! them require a running database: readiness paths are exercised against
//! a port nothing listens on.

use assert_cmd::Command;
use predicates::prelude::*;

/// A URL whose connection attempt fails immediately: port 1 is reserved
/// and nothing listens on it.
const UNREACHABLE_URL: &str = "postgres://app@127.0.0.1:1/app";

fn dbready() -> Command {
    let mut cmd = Command::cargo_bin("dbready").expect("Failed to find dbready binary");
    // Isolate from any ambient configuration.
    cmd.env_remove("DBREADY_DATABASE_URL");
    cmd.env_remove("DBREADY_WAIT_TIMEOUT");
    cmd
}

#[test]
fn test_cli_no_arguments_shows_usage() {
    dbready()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version_flag() {
    dbready()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dbready"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_status_without_url_is_a_config_error() {
    dbready()
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DBREADY_DATABASE_URL"));
}

#[test]
fn test_status_rejects_foreign_scheme() {
    dbready()
        .args(["status", "--database-url", "mysql://localhost/app"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("mysql"));
}

#[test]
fn test_status_against_unreachable_database_exits_1() {
    dbready()
        .args(["status", "--database-url", UNREACHABLE_URL])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unreachable"));
}

#[test]
fn test_status_json_reports_unreachable() {
    let output = dbready()
        .args(["status", "--json", "--database-url", UNREACHABLE_URL])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["reachable"], false);
    assert!(report["error"].is_string());
    assert!(report["head"].is_string());
}

#[test]
fn test_check_only_against_unreachable_database_exits_1() {
    dbready()
        .args([
            "migrate",
            "--check-only",
            "--database-url",
            UNREACHABLE_URL,
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unreachable"));
}

#[test]
fn test_check_only_honors_wait_for_db() {
    let start = std::time::Instant::now();

    dbready()
        .args([
            "migrate",
            "--wait-for-db",
            "--timeout",
            "1",
            "--check-only",
            "--database-url",
            UNREACHABLE_URL,
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unreachable"));

    // The wait budget must be spent before the check answers; a connection
    // refused on this URL otherwise fails in milliseconds.
    assert!(
        start.elapsed() >= std::time::Duration::from_secs(1),
        "check-only returned after {:?} without waiting out the budget",
        start.elapsed()
    );
}

#[test]
fn test_migrate_wait_with_zero_timeout_probes_once() {
    dbready()
        .args([
            "migrate",
            "--wait-for-db",
            "--timeout",
            "0",
            "--database-url",
            UNREACHABLE_URL,
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unreachable after 0s"));
}

#[test]
fn test_create_scaffolds_a_chained_revision() {
    let dir = tempfile::tempdir().unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    dbready()
        .args([
            "create",
            "initial schema",
            "--no-autogenerate",
            "--dir",
            dir_arg,
        ])
        .assert()
        .success();

    let first: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(first.len(), 1);
    let first_id = first[0].file_stem().unwrap().to_str().unwrap().to_string();
    assert!(first_id.ends_with("_initial_schema"));

    dbready()
        .args([
            "create",
            "add widgets",
            "--no-autogenerate",
            "--dir",
            dir_arg,
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(&first_id));

    // The second file names the first as its predecessor.
    let second = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.file_stem().unwrap().to_str().unwrap().ends_with("_add_widgets"))
        .expect("second revision file");
    let contents = std::fs::read_to_string(second).unwrap();
    assert!(contents.contains(&format!("-- predecessor: {first_id}")));
}

#[test]
fn test_create_without_no_autogenerate_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    dbready()
        .args([
            "create",
            "add widgets",
            "--dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--no-autogenerate"));

    // Nothing was written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
