//! # tdpack Archive Packer (`common::archive::pack`)
//!
//! File: cli/src/common/archive/pack.rs
//!
//! ## Overview
//!
//! Packs a workflow project directory into an in-memory gzipped tarball that
//! the upload transport sends as-is. The project tree is not fully trusted, so
//! the walk enforces:
//!
//! - **No symlinks**: a symlink anywhere in the tree fails the pack.
//! - **No hidden entries**: names starting with `.` are skipped, directories
//!   together with their whole subtree. `.td-hooks.json` and `.tdpack.toml`
//!   are therefore never shipped.
//! - **Quotas**: file count, per-file size and cumulative size, checked while
//!   walking and while streaming so an oversized tree fails early.
//!
//! ## Architecture
//!
//! Three layers, innermost first: file content (`QuotaReader` over the open
//! file) -> `tar::Builder` -> `flate2::write::GzEncoder` -> `Vec<u8>`.
//!
//! - The walk is `walkdir` with lexical ordering and `follow_links(false)`.
//!   Hidden directories are pruned with `skip_current_dir`, so nothing below
//!   them is visited.
//! - Headers carry the relative path and permission bits only (mtime, uid and
//!   gid are zero), so the same tree always yields the same bytes.
//! - The tar builder is finished before the gzip encoder, so the gzip trailer
//!   covers the tar end-of-archive blocks.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{limits::PackagingLimits, pack};
//! # fn run() -> anyhow::Result<()> {
//! let packed = pack::pack(Path::new("./my_workflow"), &PackagingLimits::default().into())?;
//! println!("packed {} bytes", packed.bytes.len());
//! # Ok(())
//! # }
//! ```
//!
use super::limits::{limit_error, PackagingLimits, QuotaReader, QuotaTracker};
use crate::common::fs::io::{file_mode, is_symlink_refusal, open_nofollow};
use crate::common::security::confine::starts_with_parent;
use crate::core::error::{ArchiveError, PackError, SecurityError};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read};
use std::path::Path;
use tar::{Builder, EntryType, Header};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Knobs for a pack call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    pub limits: PackagingLimits,
    /// gzip level, 0-9.
    pub compression_level: u32,
}

impl From<PackagingLimits> for PackOptions {
    fn from(limits: PackagingLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            limits: PackagingLimits::default(),
            compression_level: Compression::default().level(),
        }
    }
}

/// Counts reported alongside a packed archive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub files: usize,
    pub directories: usize,
    /// Uncompressed content bytes.
    pub content_bytes: u64,
    pub skipped_hidden: usize,
}

/// A finished archive and what went into it.
#[derive(Debug, Clone)]
pub struct PackedArchive {
    pub bytes: Vec<u8>,
    pub summary: PackSummary,
}

/// Packs `source_dir` into a gzipped tarball.
///
/// # Arguments
///
/// * `source_dir` - Project directory. Its contents become the archive root;
///   the directory itself is not an entry.
/// * `options` - Quotas and compression level.
///
/// # Errors
///
/// * `SecurityError::SymlinkNotAllowed` for any symlink in the tree.
/// * `SecurityError::PathTraversal` if an entry's relative path would leave the root.
/// * `ResourceLimitError::*` when a quota is exceeded. Directories and files
///   both count against `max_entry_count`, as they do when unpacking.
/// * `ArchiveError::Io` for walk, read or compression failures, naming the entry.
pub fn pack(source_dir: &Path, options: &PackOptions) -> Result<PackedArchive, PackError> {
    let root = source_dir.canonicalize().map_err(|e| {
        ArchiveError::io(
            format!("failed to resolve source directory {}", source_dir.display()),
            e,
        )
    })?;
    if !root.is_dir() {
        return Err(ArchiveError::io(
            format!("source {} is not a directory", root.display()),
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    info!("Packing {}", root.display());

    let mut tar_gz_bytes = Vec::new();
    let encoder = GzEncoder::new(
        &mut tar_gz_bytes,
        Compression::new(options.compression_level.min(9)),
    );
    let mut builder = Builder::new(encoder);
    let mut tracker = QuotaTracker::new(options.limits);
    let mut summary = PackSummary::default();

    let mut walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| {
            let context = match e.path() {
                Some(p) => format!("failed to walk {}", p.display()),
                None => "failed to walk source directory".to_string(),
            };
            ArchiveError::io(context, e.into())
        })?;
        if entry.depth() == 0 {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            return Err(SecurityError::SymlinkNotAllowed {
                path: entry.path().display().to_string(),
            }
            .into());
        }

        // Unreachable with a correct walk; kept so a refactor can't silently
        // start emitting entries outside the root.
        let relative = entry.path().strip_prefix(&root).map_err(|_| {
            SecurityError::PathTraversal {
                path: entry.path().display().to_string(),
            }
        })?;
        if relative.is_absolute() || starts_with_parent(relative) {
            return Err(SecurityError::PathTraversal {
                path: relative.display().to_string(),
            }
            .into());
        }

        if entry.file_name().to_string_lossy().starts_with('.') {
            debug!("Skipping hidden entry {}", relative.display());
            summary.skipped_hidden += 1;
            if file_type.is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        let name = relative.to_string_lossy().into_owned();
        if file_type.is_dir() {
            tracker.admit_entry()?;
            append_dir(&mut builder, &entry, relative, &name)?;
            summary.directories += 1;
        } else if file_type.is_file() {
            tracker.admit_entry()?;
            append_file(&mut builder, &mut tracker, entry.path(), relative, &name)?;
        } else {
            warn!("Skipping {} (not a regular file or directory)", name);
        }
    }

    // Finish tar first so its end-of-archive blocks go through gzip, then
    // finish gzip to write the trailer.
    let encoder = builder
        .into_inner()
        .map_err(|e| ArchiveError::io("failed to finalize tar archive", e))?;
    encoder
        .finish()
        .map_err(|e| ArchiveError::io("failed to finish gzip stream", e))?;

    summary.files = tracker.files();
    summary.content_bytes = tracker.total_bytes();
    info!(
        "Packed {} file(s), {} director(ies), {} content bytes into {} bytes",
        summary.files,
        summary.directories,
        summary.content_bytes,
        tar_gz_bytes.len()
    );

    Ok(PackedArchive {
        bytes: tar_gz_bytes,
        summary,
    })
}

fn base_header(entry_type: EntryType, mode: u32, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_size(size);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header
}

fn append_dir<W: io::Write>(
    builder: &mut Builder<W>,
    entry: &walkdir::DirEntry,
    relative: &Path,
    name: &str,
) -> Result<(), PackError> {
    let metadata = entry
        .metadata()
        .map_err(|e| ArchiveError::io(format!("failed to stat {name}"), e.into()))?;
    let mut header = base_header(EntryType::Directory, file_mode(&metadata), 0);
    builder
        .append_data(&mut header, relative, io::empty())
        .map_err(|e| ArchiveError::io(format!("failed to add directory {name}"), e))?;
    debug!("Added directory {}", name);
    Ok(())
}

fn append_file<W: io::Write>(
    builder: &mut Builder<W>,
    tracker: &mut QuotaTracker,
    path: &Path,
    relative: &Path,
    name: &str,
) -> Result<(), PackError> {
    // Open first and stat the handle, so the size and type we check are those
    // of the file we actually read.
    let file = open_nofollow(path).map_err(|e| {
        if is_symlink_refusal(&e) {
            ArchiveError::from(SecurityError::SymlinkNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            ArchiveError::io(format!("failed to open {name}"), e)
        }
    })?;
    let metadata = file
        .metadata()
        .map_err(|e| ArchiveError::io(format!("failed to stat {name}"), e))?;
    if !metadata.is_file() {
        return Err(ArchiveError::io(
            format!("{name} is no longer a regular file"),
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let size = metadata.len();

    tracker.admit_file(name, size)?;

    let mut header = base_header(EntryType::Regular, file_mode(&metadata), size);
    let mut reader = QuotaReader::new(file.take(size), tracker, name);
    builder
        .append_data(&mut header, relative, &mut reader)
        .map_err(|e| match limit_error(&e) {
            Some(limit) => ArchiveError::from(limit),
            None => ArchiveError::io(format!("failed to add file {name}"), e),
        })?;

    if reader.bytes_read() != size {
        return Err(ArchiveError::io(
            format!("file {name} changed while packing"),
            io::Error::new(io::ErrorKind::UnexpectedEof, "short read"),
        ));
    }
    debug!("Added file {} ({} bytes)", name, size);
    Ok(())
}
