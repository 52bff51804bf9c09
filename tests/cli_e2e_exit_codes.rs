//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Fatal error (configuration, scanning or linking)
//! - Exit code 2: Invalid command-line usage (handled by clap)

mod common;
use common::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("mirror-split");

    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--list"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("mirror-split");

    cmd.arg("--version").assert().code(0);
}

/// Exit code 2 is returned for unknown flags.
#[test]
fn test_exit_code_usage_error() {
    let mut cmd = cargo_bin_cmd!("mirror-split");

    cmd.arg("--frobnicate").assert().code(2);
}

/// Exit code 1 is returned for configuration file not found.
#[test]
fn test_exit_code_config_not_found() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("mirror-split");

    cmd.current_dir(temp.path())
        .env_remove("MIRROR_SPLIT_CONFIG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("mirror-split.yaml"))
        .stderr(predicate::str::contains("hint:"));
}

/// The config path can come from the environment.
#[test]
fn test_config_from_environment() {
    let fixture = ArchiveFixture::new().with_config("basic-trees: [amd64]\n");

    let mut cmd = cargo_bin_cmd!("mirror-split");
    cmd.current_dir(fixture.path())
        .env("MIRROR_SPLIT_CONFIG", fixture.config_path())
        .arg("--list")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("amd64 contains"));
}

/// Exit code 1 is returned for an invalid configuration.
#[test]
fn test_exit_code_invalid_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("mirror-split.yaml");
    config.write_str("ftp-path: /srv/master\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mirror-split");

    cmd.current_dir(temp.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"))
        .stderr(predicate::str::contains("tree-root-path"));
}

/// Exit code 1 is returned when the master tree cannot be scanned.
#[test]
fn test_exit_code_missing_master() {
    let fixture = ArchiveFixture::new().with_config("basic-trees: [amd64]\n");
    std::fs::remove_dir(fixture.master()).unwrap();

    fixture
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Scan error"));

    assert!(!fixture.db().join("amd64.db").exists());
}
