//! # tdpack Archive Unpacker (`common::archive::unpack`)
//!
//! File: cli/src/common/archive/unpack.rs
//!
//! ## Overview
//!
//! Extracts a downloaded project archive (gzipped tar) into a directory. The
//! archive is untrusted: it may have been crafted rather than produced by
//! `pack`, and its headers may lie about sizes.
//!
//! ## Architecture
//!
//! `&[u8]` -> `flate2::read::GzDecoder` -> `tar::Archive` -> per-entry
//! `QuotaReader` -> output file. For every entry:
//!
//! 1. Empty names (and the bare root, `.`) are skipped.
//! 2. The name is cleaned lexically. Absolute names and names that still
//!    contain `..` are rejected (`UnsafePath`).
//! 3. The target is joined onto the root and re-checked with `confine`.
//! 4. Entry type dispatch: directories are created, regular files are written,
//!    symlinks and hard links fail (`LinksNotAllowed`), anything else is skipped.
//! 5. Regular files pass the same quotas as packing: file count and header
//!    size up front, then at most `max_file_size + 1` content bytes through a
//!    `QuotaReader`, which also charges the total-size quota.
//!
//! Every entry, whatever its type, counts against `max_entry_count`, and the
//! header size of any non-regular entry is charged to the total-size quota
//! before dispatch: the tar reader decompresses that payload even when the
//! entry itself is skipped.
//!
//! Each output file handle is dropped as soon as its entry is copied.
//! On error the destination may hold a partial tree; callers must discard it.
//!
use super::limits::{limit_error, PackagingLimits, QuotaReader, QuotaTracker};
use crate::common::fs::io::{create_dir_with_mode, create_file_with_mode};
use crate::common::security::{clean_path, confine};
use crate::core::error::{ArchiveError, SecurityError, UnpackError};
use flate2::read::GzDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::{debug, info, warn};

/// Counts reported after a successful extraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnpackSummary {
    pub files: usize,
    pub directories: usize,
    pub content_bytes: u64,
    /// Entries of unsupported types (fifos, devices, ...) that were skipped.
    pub skipped: usize,
}

/// Extracts `archive` into `output_dir`.
///
/// # Arguments
///
/// * `archive` - gzipped tar bytes as received from the download transport.
/// * `output_dir` - Destination; created (with parents) if missing. Becomes
///   the containment root for every entry.
/// * `limits` - Quotas re-applied during extraction.
///
/// # Errors
///
/// * `SecurityError::UnsafePath` for absolute or escaping entry names.
/// * `SecurityError::LinksNotAllowed` for symlink or hard-link entries.
/// * `ResourceLimitError::*` when a quota is exceeded.
/// * `ArchiveError::Io` for corrupt streams or write failures, naming the entry.
pub fn unpack(
    archive: &[u8],
    output_dir: &Path,
    limits: &PackagingLimits,
) -> Result<UnpackSummary, UnpackError> {
    fs::create_dir_all(output_dir).map_err(|e| {
        ArchiveError::io(format!("failed to create {}", output_dir.display()), e)
    })?;
    let root = output_dir.canonicalize().map_err(|e| {
        ArchiveError::io(format!("failed to resolve {}", output_dir.display()), e)
    })?;
    let root = clean_path(&root);
    info!("Unpacking {} bytes into {}", archive.len(), root.display());

    let mut tar = Archive::new(GzDecoder::new(archive));
    let mut tracker = QuotaTracker::new(*limits);
    let mut summary = UnpackSummary::default();

    let entries = tar
        .entries()
        .map_err(|e| ArchiveError::io("failed to read archive", e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| ArchiveError::io("failed to read archive entry", e))?;

        let raw = entry
            .path()
            .map_err(|e| ArchiveError::io("failed to decode entry name", e))?
            .into_owned();
        if raw.as_os_str().is_empty() {
            continue;
        }
        let name = raw.display().to_string();
        tracker.admit_entry()?;

        let header = entry.header();
        let entry_type = header.entry_type();
        let declared = header
            .size()
            .map_err(|e| ArchiveError::io(format!("invalid size for {name}"), e))?;
        let mode = header
            .mode()
            .map_err(|e| ArchiveError::io(format!("invalid mode for {name}"), e))?;
        let is_regular = matches!(entry_type, EntryType::Regular | EntryType::Continuous);
        if !is_regular {
            tracker.charge(declared)?;
        }

        let Some(target) = resolve_target(&raw, &root, &name)? else {
            debug!("Skipping root entry {:?}", name);
            continue;
        };

        match entry_type {
            EntryType::Directory => {
                create_dir_with_mode(&target, mode).map_err(|e| {
                    ArchiveError::io(format!("failed to create directory {name}"), e)
                })?;
                summary.directories += 1;
                debug!("Created directory {}", name);
            }
            EntryType::Regular | EntryType::Continuous => {
                tracker.admit_file(&name, declared)?;
                let written = write_file(&mut entry, &target, mode, &name, &mut tracker)?;
                debug!("Extracted {} ({} bytes)", name, written);
            }
            EntryType::Symlink | EntryType::Link => {
                return Err(SecurityError::LinksNotAllowed { path: name }.into());
            }
            other => {
                warn!("Skipping {} with unsupported entry type {:?}", name, other);
                summary.skipped += 1;
            }
        }
    }

    summary.files = tracker.files();
    summary.content_bytes = tracker.total_bytes();
    info!(
        "Unpacked {} file(s), {} director(ies), {} content bytes",
        summary.files, summary.directories, summary.content_bytes
    );
    Ok(summary)
}

/// Maps an entry name to its output path, or `None` for the root itself.
fn resolve_target(raw: &Path, root: &Path, name: &str) -> Result<Option<PathBuf>, UnpackError> {
    let cleaned = clean_path(raw);
    let unsafe_path = || SecurityError::UnsafePath {
        path: name.to_string(),
    };

    let escapes = cleaned.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if cleaned.is_absolute() || escapes {
        return Err(unsafe_path().into());
    }
    if cleaned == Path::new(".") {
        return Ok(None);
    }

    // Second, independent check through the shared confinement routine.
    let target = confine(&cleaned, root).map_err(|_| unsafe_path())?;
    Ok(Some(target))
}

fn write_file<R: Read>(
    entry: &mut R,
    target: &Path,
    mode: u32,
    name: &str,
    tracker: &mut QuotaTracker,
) -> Result<u64, UnpackError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ArchiveError::io(format!("failed to create parent directory for {name}"), e)
        })?;
    }

    let mut file = create_file_with_mode(target, mode)
        .map_err(|e| ArchiveError::io(format!("failed to create {name}"), e))?;

    // One byte past the limit is enough to prove a lying header.
    let cap = tracker.limits().max_file_size.saturating_add(1);
    let mut reader = QuotaReader::new(entry.take(cap), tracker, name);
    let copied = io::copy(&mut reader, &mut file).map_err(|e| match limit_error(&e) {
        Some(limit) => ArchiveError::from(limit),
        None => ArchiveError::io(format!("failed to write {name}"), e),
    });
    drop(file);
    copied
}
