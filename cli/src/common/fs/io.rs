//! # tdpack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem operations the packer, unpacker and
//! command handlers share. It wraps `std::fs` with two goals: consistent error
//! context (`anyhow::Context`) for the command layer, and link-safe primitives
//! for the archive layer.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, failing if the path exists as a non-directory.
//! - **`read_file_bytes`** / **`write_bytes_to_file`**: whole-file I/O with context.
//! - **`open_nofollow`**: opens a file for reading, refusing to follow a
//!   symlink in the final component (`O_NOFOLLOW` on Unix).
//! - **`create_file_with_mode`** / **`create_dir_with_mode`**: create extraction
//!   targets with archive permission bits (subject to the umask).
//! - **`file_mode`**: permission bits of a file, masked to `0o777`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! # fn run() -> anyhow::Result<()> {
//! io::ensure_dir_exists(Path::new("./out"))?;
//! io::write_bytes_to_file(Path::new("./out/project.tar.gz"), &bytes)?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{Result, TdpackError};
use anyhow::Context;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Permission bits carried through archives. setuid/setgid/sticky are dropped.
pub const MODE_MASK: u32 = 0o777;

/// Ensures that a directory exists at the specified path, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// it fails (e.g., permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(TdpackError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads an entire file into memory.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, creating the parent directory and overwriting
/// any existing file.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Permission bits of `metadata`, masked with `MODE_MASK`.
#[cfg(unix)]
pub fn file_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & MODE_MASK
}

/// Conventional permission bits for platforms without Unix modes.
#[cfg(not(unix))]
pub fn file_mode(metadata: &Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Opens `path` read-only without following a symlink in its last component.
pub fn open_nofollow(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }
    options.open(path)
}

/// Whether an open error came from `O_NOFOLLOW` hitting a symlink.
pub fn is_symlink_refusal(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::ELOOP)
    }
    #[cfg(not(unix))]
    {
        let _ = err;
        false
    }
}

/// Creates (or truncates) a file for writing with `mode` applied on creation.
///
/// On Unix a symlink at `path` is refused rather than followed.
pub fn create_file_with_mode(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & MODE_MASK).custom_flags(libc::O_NOFOLLOW);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

/// Creates a directory (and parents) with `mode` applied to newly created
/// components. The owner always keeps `rwx` so the tree stays writable for
/// the rest of the extraction.
pub fn create_dir_with_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode((mode & MODE_MASK) | 0o700);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}
