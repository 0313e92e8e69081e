//! CLI integration tests for tbs.
//!
//! These tests drive the `tbs` binary the way a shell user would.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the tbs binary command.
fn tbs() -> Command {
    let mut cmd = Command::cargo_bin("tbs").unwrap();
    cmd.env_remove("TBS_ENV_FILE").env_remove("RUST_LOG");
    cmd
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// tbs env
// ============================================================================

#[test]
fn test_env_set_and_show() {
    let tmp = temp_dir();

    tbs()
        .args(["env", "set", "arch=x86_64", "cxx=clang++"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join(".tbs.env").exists());

    tbs()
        .args(["env", "show"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::eq("arch=x86_64\ncxx=clang++\n"));
}

#[test]
fn test_env_file_is_json() {
    let tmp = temp_dir();

    tbs()
        .args(["env", "--file", "custom.env", "set", "linker=ld"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let contents = fs::read_to_string(tmp.path().join("custom.env")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["linker"], "ld");
}

#[test]
fn test_env_unset_and_clear() {
    let tmp = temp_dir();

    tbs()
        .args(["env", "set", "a=1", "b=2"])
        .current_dir(tmp.path())
        .assert()
        .success();

    tbs()
        .args(["env", "unset", "a"])
        .current_dir(tmp.path())
        .assert()
        .success();

    tbs()
        .args(["env", "show"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::eq("b=2\n"));

    tbs()
        .args(["env", "clear"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join(".tbs.env").exists());
}

#[test]
fn test_env_set_rejects_bad_pair() {
    let tmp = temp_dir();

    tbs()
        .args(["env", "set", "novalue"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}

#[test]
fn test_env_show_rejects_malformed_file() {
    let tmp = temp_dir();
    fs::write(tmp.path().join(".tbs.env"), "not json").unwrap();

    tbs()
        .args(["env", "show"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse env"));
}

// ============================================================================
// tbs need
// ============================================================================

#[cfg(unix)]
#[test]
fn test_need_found() {
    tbs()
        .args(["need", "sh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sh: /"));
}

#[cfg(unix)]
#[test]
fn test_need_missing_mandatory_fails() {
    tbs()
        .args(["need", "tbs-surely-not-installed-tool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "need: 'tbs-surely-not-installed-tool' is not found",
        ));
}

#[cfg(unix)]
#[test]
fn test_need_missing_optional_warns() {
    tbs()
        .args(["need", "--optional", "tbs-surely-not-installed-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

// ============================================================================
// tbs files
// ============================================================================

#[test]
fn test_files_include_exclude() {
    let tmp = temp_dir();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("boot32.cc"), "").unwrap();
    fs::write(src.join("kmain.cc"), "").unwrap();
    fs::write(src.join("apic.cc"), "").unwrap();
    fs::write(src.join("config.h"), "").unwrap();

    tbs()
        .args(["files", "src/*.cc", "--exclude", "src/boot32.cc"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::eq("src/apic.cc\nsrc/kmain.cc\n"));
}

#[test]
fn test_files_invalid_pattern() {
    tbs()
        .args(["files", "src/[*.cc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid glob pattern"));
}

// ============================================================================
// global flags
// ============================================================================

#[test]
fn test_rejects_bad_verbosity() {
    tbs()
        .args(["-v", "9", "files", "*.cc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid verbosity"));
}
