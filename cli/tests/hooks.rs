//! # tdpack CLI Hooks Integration Tests
//!
//! File: cli/tests/hooks.rs
//!
//! ## Overview
//!
//! Integration tests for `tdpack hooks run`, `tdpack hooks check`, and the hook
//! stage of `tdpack pack`. Hooks spawn real processes (`true`, `false`,
//! `touch`, `sleep`), so the whole file is Unix-only.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_hooks_run_without_config() {
    let temp = tempdir().unwrap();
    tdpack_cmd()
        .args(["hooks", "run"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No pre-upload hooks configured"));
}

#[test]
fn test_hooks_run_continues_after_tolerated_failure() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "flaky", "command": ["false"], "fail_on_error": false},
            {"name": "mark", "command": ["touch", "marker"], "fail_on_error": true}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "run"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Running hook 'flaky'"))
        .stdout(predicate::str::contains("2 hook(s) run, 1 failure(s) tolerated"))
        .stderr(predicate::str::contains("continuing"));

    assert!(temp.path().join("marker").exists());
}

#[test]
fn test_hooks_run_stops_on_fail_fast_hook() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "gate", "command": ["false"], "fail_on_error": true},
            {"name": "mark", "command": ["touch", "marker"], "fail_on_error": true}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "run"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("hook 'gate' failed"));

    assert!(!temp.path().join("marker").exists());
}

#[test]
fn test_hooks_run_kills_hook_on_timeout() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "slow", "command": ["sleep", "30"], "timeout": 1, "fail_on_error": true}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "run"])
        .arg(temp.path())
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("timed out after 1s"));
}

#[test]
fn test_hooks_run_uses_confined_working_dir() {
    let temp = tempdir().unwrap();
    std::fs::create_dir(temp.path().join("build")).unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "mark", "command": ["touch", "here"], "fail_on_error": true, "working_dir": "build"}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "run"])
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("build/here").exists());
}

#[test]
fn test_hooks_check_reports_hooks_without_running() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "mark", "command": ["touch", "marker"], "timeout": 5, "fail_on_error": true}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "check"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pre-upload hook(s)"))
        .stdout(predicate::str::contains("timeout:     5s"))
        .stdout(predicate::str::contains("on failure:  abort"));

    assert!(!temp.path().join("marker").exists());
}

#[test]
fn test_hooks_check_rejects_dangerous_command() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "inject", "command": ["echo", "hi; rm -rf /"], "fail_on_error": false}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "check"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid hook 'inject'"))
        .stderr(predicate::str::contains("dangerous character"));
}

#[test]
fn test_hooks_check_rejects_escaping_working_dir() {
    let temp = tempdir().unwrap();
    write_hooks(
        temp.path(),
        r#"{"pre_upload_hooks": [
            {"name": "escape", "command": ["true"], "fail_on_error": false, "working_dir": "../.."}
        ]}"#,
    );

    tdpack_cmd()
        .args(["hooks", "check"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("escapes root"));
}

#[test]
fn test_hooks_check_rejects_malformed_json() {
    let temp = tempdir().unwrap();
    write_hooks(temp.path(), "{ not json");

    tdpack_cmd()
        .args(["hooks", "check"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse hook config"));
}

#[test]
fn test_pack_aborts_before_archiving_when_hook_fails() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("proj");
    write_file(&project, "main.dig", "timezone: UTC");
    write_hooks(
        &project,
        r#"{"pre_upload_hooks": [{"name": "gate", "command": ["false"], "fail_on_error": true}]}"#,
    );
    let archive = temp.path().join("proj.tar.gz");

    tdpack_cmd()
        .arg("pack")
        .arg(&project)
        .arg("-o")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pre-upload hooks failed"));
    assert!(!archive.exists());
}

#[test]
fn test_pack_skip_hooks() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("proj");
    write_file(&project, "main.dig", "timezone: UTC");
    write_hooks(
        &project,
        r#"{"pre_upload_hooks": [{"name": "gate", "command": ["false"], "fail_on_error": true}]}"#,
    );
    let archive = temp.path().join("proj.tar.gz");

    tdpack_cmd()
        .arg("pack")
        .arg(&project)
        .arg("-o")
        .arg(&archive)
        .arg("--skip-hooks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping pre-upload hooks"));
    assert!(archive.exists());
}
