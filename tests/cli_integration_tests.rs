//! CLI Integration Tests
//!
//! Runs the `divisas` binary with assert_cmd. None of these reach the
//! network: they stop at argument or date validation.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("divisas"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("divisas"));
}

#[test]
fn test_download_help() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.args(["download", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("swapped"));
}

// ═══════════════════════════════════════════════════════════════════════════
// FILENAME AND SYMBOLS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_filename_command() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.args(["filename", "--start", "01/01/2024", "--end", "31/01/2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "historial_divisas_cop_20240101_a_20240131.xlsx",
        ));
}

#[test]
fn test_filename_command_swaps_and_warns() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.args(["filename", "-s", "31/01/2024", "-e", "01/01/2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "historial_divisas_cop_20240101_a_20240131.xlsx",
        ))
        .stderr(predicate::str::contains("swapped").count(1));
}

#[test]
fn test_swap_warning_shown_once_with_debug_logging() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.env("RUST_LOG", "divisas_cop=debug")
        .args(["filename", "-s", "31/01/2024", "-e", "01/01/2024"])
        .assert()
        .success()
        .stderr(predicate::str::contains("after end date").count(1));
}

#[test]
fn test_symbols_command() {
    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.arg("symbols")
        .assert()
        .success()
        .stdout(predicate::str::contains("USDCOP=X"))
        .stdout(predicate::str::contains("EURCOP=X"))
        .stdout(predicate::str::contains("Valor Cierre EUR/COP"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATE VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_download_bad_date_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.args(["download", "--start", "31-01-2024", "--end", "31/01/2024"])
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dd/mm/yyyy"));

    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_download_prompt_closed_input_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("divisas").unwrap();
    cmd.arg("download")
        .arg("--output-dir")
        .arg(temp_dir.path())
        .write_stdin("31-01-2024\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please try again."))
        .stderr(predicate::str::contains("start date"));

    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
