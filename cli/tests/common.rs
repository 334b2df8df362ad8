//! # tdpack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`
//! (`project.rs`, `hooks.rs`). Each of those files is compiled as its own test
//! crate and drives the compiled `tdpack` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// # Get tdpack Command (`tdpack_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `tdpack` binary, with
/// `TDPACK_CONFIG` and `RUST_LOG` cleared so the host environment cannot
/// change limits or log output under test.
///
/// ## Panics
/// Panics if the `tdpack` binary cannot be found via `Command::cargo_bin`.
pub fn tdpack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tdpack").expect("Failed to find tdpack binary for testing");
    cmd.env_remove("TDPACK_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

/// Writes a `.td-hooks.json` into `project`.
pub fn write_hooks(project: &Path, json: &str) {
    write_file(project, ".td-hooks.json", json);
}
