//! # tdpack Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout tdpack. The packaging
//! pipeline runs under adversarial input (an untrusted project tree or a
//! downloaded archive), so every failure class is a distinct, typed error that
//! callers can match on instead of a free-form message.
//!
//! ## Architecture
//!
//! The error system is layered:
//! - **Taxonomy enums** (`thiserror`), one per failure class:
//!   - `ValidationError`: unsafe hook declarations, command vectors or paths.
//!   - `ResourceLimitError`: file-count, per-file or total-size quota exceeded.
//!   - `SecurityError`: symlinks, links in archives, paths escaping a root.
//!   - `ExecutionError`: a hook process failed, could not start or timed out.
//! - **Subsystem enums** composing the taxonomy:
//!   - `HookError` for the hook runner.
//!   - `ArchiveError` for the packer and unpacker (`PackError` / `UnpackError`).
//! - **`TdpackError`** for tool-level configuration and filesystem helpers.
//! - **`Result<T>`**, an alias for `anyhow::Result<T>` used by command handlers.
//!
//! Any error returned by the packer or unpacker means the operation did not
//! complete; partial output must be discarded by the caller.
//!
//! ## Examples
//!
//! ```rust
//! match archive::unpack::unpack(&bytes, dest, &limits) {
//!     Err(ArchiveError::Security(SecurityError::UnsafePath { path })) => {
//!         eprintln!("refusing to extract {path}");
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Tool-level errors raised outside the packaging core (config loading, fs helpers).
#[derive(Error, Debug)]
pub enum TdpackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),
}

/// Malformed or unsafe declarations, surfaced before any execution or I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("command is empty")]
    EmptyCommand,

    #[error("argument {index} is too long ({len} chars, max {max})")]
    ArgumentTooLong { index: usize, len: usize, max: usize },

    #[error("argument {index} contains dangerous character {ch:?}")]
    DangerousCharacter { index: usize, ch: char },

    #[error("executable path '{path}' must not contain '..'")]
    UnsafeExecutablePath { path: String },

    #[error("hook name must not be empty")]
    EmptyHookName,

    #[error("timeout {seconds}s is out of range (0..={max}s)")]
    InvalidTimeout { seconds: i64, max: u64 },

    #[error("path '{path}' escapes root '{}'", root.display())]
    PathEscapesRoot { path: String, root: PathBuf },

    #[error("cannot resolve root '{}' to an absolute path", root.display())]
    UnresolvableRoot { root: PathBuf },
}

/// A hard quota was exceeded during packing or unpacking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceLimitError {
    #[error("too many files (max {max})")]
    TooManyFiles { max: usize },

    #[error("too many archive entries (max {max})")]
    TooManyEntries { max: usize },

    #[error("file '{path}' is too large ({size} bytes, max {max})")]
    FileTooLarge { path: String, size: u64, max: u64 },

    #[error("archive exceeds the total size limit of {max} bytes")]
    ArchiveTooLarge { max: u64 },
}

/// Anything that would read or write outside the sandbox. Never recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("symbolic link not allowed: {path}")]
    SymlinkNotAllowed { path: String },

    #[error("path traversal detected: {path}")]
    PathTraversal { path: String },

    #[error("unsafe path in archive: {path}")]
    UnsafePath { path: String },

    #[error("links are not allowed in archives: {path}")]
    LinksNotAllowed { path: String },
}

/// Hook subprocess failures. Recoverable per hook via `fail_on_error`.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("hook '{name}' could not be run: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("hook '{name}' failed: {status}")]
    HookFailed { name: String, status: ExitStatus },

    #[error("hook '{name}' timed out after {}s", timeout.as_secs())]
    HookTimedOut { name: String, timeout: Duration },
}

/// Errors raised while loading, validating or running pre-upload hooks.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("failed to read hook config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse hook config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid hook '{hook}': {source}")]
    ConfigValidation {
        hook: String,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Errors raised by the archive packer and unpacker.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(transparent)]
    Limit(#[from] ResourceLimitError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Wraps an I/O error with the entry or operation it happened on.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type PackError = ArchiveError;
pub type UnpackError = ArchiveError;

/// Type alias for Result using anyhow::Error for command handlers.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = TdpackError::Config("max_file_count must be > 0".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: max_file_count must be > 0"
        );

        let dangerous = ValidationError::DangerousCharacter { index: 1, ch: ';' };
        assert_eq!(
            dangerous.to_string(),
            "argument 1 contains dangerous character ';'"
        );

        let too_large = ResourceLimitError::FileTooLarge {
            path: "data/blob.bin".into(),
            size: 11,
            max: 10,
        };
        assert_eq!(
            too_large.to_string(),
            "file 'data/blob.bin' is too large (11 bytes, max 10)"
        );
    }

    #[test]
    fn test_archive_error_is_transparent_over_taxonomy() {
        let err: ArchiveError = SecurityError::UnsafePath {
            path: "../evil".into(),
        }
        .into();
        assert_eq!(err.to_string(), "unsafe path in archive: ../evil");
        assert!(matches!(
            err,
            ArchiveError::Security(SecurityError::UnsafePath { .. })
        ));
    }

    #[test]
    fn test_timeout_display_uses_seconds() {
        let err = ExecutionError::HookTimedOut {
            name: "lint".into(),
            timeout: Duration::from_secs(60),
        };
        assert_eq!(err.to_string(), "hook 'lint' timed out after 60s");
    }
}
