//! Integration tests for the optdeps binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

mod common;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn optdeps(site: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("optdeps"));
    cmd.env_remove("OPTDEPS_PATH")
        .env_remove("OPTDEPS_CONFIG")
        .env_remove("VIRTUAL_ENV")
        .arg("--path")
        .arg(site.path());
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("optdeps"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("optional Python package"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("optdeps"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn check_installed_package_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["check", "packaging>0.1", "pytest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("packaging 24.0"))
        .stdout(predicate::str::contains("pytest 8.1.1"));
    Ok(())
}

#[test]
fn check_missing_package_fails() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["check", "packaging", "notarealpackage123"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("notarealpackage123 not installed"));
    Ok(())
}

#[test]
fn check_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    let output = optdeps(&site)
        .args(["check", "--json", "broken"])
        .output()?;
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["state"], "not_installed");
    assert_eq!(value[0]["satisfied"], false);
    Ok(())
}

#[test]
fn version_prints_installed_version() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["version", "PyTest"])
        .assert()
        .success()
        .stdout("8.1.1\n");
    Ok(())
}

#[test]
fn version_of_missing_package_errors() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["version", "notarealpackage123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not installed"));
    Ok(())
}

#[test]
fn invalid_name_errors() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["version", "_hidden"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid package name"));
    Ok(())
}

#[test]
fn inspect_reports_unparsable_version() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    optdeps(&site)
        .args(["inspect", "broken"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unparsable version"));
    Ok(())
}

#[test]
fn paths_lists_config_file_paths() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    let config_dir = TempDir::new()?;
    let config = config_dir.path().join("optdeps.yml");
    fs::write(&config, "search_paths: [vendored]\ninclude_virtualenv: false\n")?;

    optdeps(&site)
        .arg("--config")
        .arg(&config)
        .arg("paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("vendored"));
    Ok(())
}

#[test]
fn bad_config_file_exits_with_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let site = common::test_site();
    let config_dir = TempDir::new()?;
    let config = config_dir.path().join("optdeps.yml");
    fs::write(&config, "unknown_key: true\n")?;

    optdeps(&site)
        .arg("--config")
        .arg(&config)
        .arg("paths")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}
