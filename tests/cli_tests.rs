//! Integration tests for the CLI interface
//!
//! Only paths that fail or finish before any external CLI is spawned are
//! exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn directrix(state_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("directrix").unwrap();
    cmd.arg("--state-dir")
        .arg(state_dir.path())
        .env_remove("DIRECTRIX_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("directrix").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create-director"))
        .stdout(predicate::str::contains("delete-director"))
        .stdout(predicate::str::contains("lbs"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("directrix").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_create_director_without_iaas() {
    let state_dir = TempDir::new().unwrap();

    directrix(&state_dir)
        .arg("create-director")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no valid infrastructure kind provided",
        ));

    assert!(!state_dir.path().join("directrix-state.json").exists());
}

#[test]
fn test_delete_director_without_director() {
    let state_dir = TempDir::new().unwrap();
    std::fs::write(
        state_dir.path().join("directrix-state.json"),
        r#"{"iaas": "gcp", "envID": "some-env-id"}"#,
    )
    .unwrap();

    directrix(&state_dir)
        .arg("delete-director")
        .assert()
        .success()
        .stdout(predicate::str::contains("no director to delete"));
}

#[test]
fn test_lbs_requires_terraform_state() {
    let state_dir = TempDir::new().unwrap();
    std::fs::write(
        state_dir.path().join("directrix-state.json"),
        r#"{"iaas": "aws", "lb": {"type": "cf"}}"#,
    )
    .unwrap();

    directrix(&state_dir)
        .arg("lbs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("terraform state is empty"));
}

#[test]
fn test_corrupted_state_file() {
    let state_dir = TempDir::new().unwrap();
    std::fs::write(state_dir.path().join("directrix-state.json"), "{oops").unwrap();

    directrix(&state_dir)
        .arg("create-director")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load state"));
}

#[test]
fn test_invalid_config_file() {
    let state_dir = TempDir::new().unwrap();
    std::fs::write(state_dir.path().join("directrix.yml"), "unknown_key: 1\n").unwrap();

    directrix(&state_dir)
        .arg("create-director")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("unknown_key"));
}
