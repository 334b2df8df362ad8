//! # tdpack Archive Inspection (`common::archive::inspect`)
//!
//! File: cli/src/common/archive/inspect.rs
//!
//! Read-only listing of a packed archive. Streams the same gzip and tar layers
//! as `unpack` but never touches the filesystem, so it is safe to run on an
//! archive that `unpack` would reject. The listing is still bounded: every
//! entry counts against `max_entry_count`, so a header flood fails instead of
//! growing the listing without limit.
//!
use crate::common::archive::limits::{PackagingLimits, QuotaTracker};
use crate::core::error::ArchiveError;
use flate2::read::GzDecoder;
use std::fmt;
use std::path::PathBuf;
use tar::{Archive, EntryType};

/// Entry kinds as tdpack sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    HardLink,
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Directory => Self::Directory,
            EntryType::Regular | EntryType::Continuous => Self::File,
            EntryType::Symlink => Self::Symlink,
            EntryType::Link => Self::HardLink,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Directory => "dir",
            Self::File => "file",
            Self::Symlink => "symlink",
            Self::HardLink => "hardlink",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// One archive entry, as declared by its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    pub mode: u32,
}

/// Lists the entries of a gzipped tar archive in stream order.
///
/// Only the entry cap of `limits` applies; sizes are reported, not enforced.
pub fn list_entries(
    archive: &[u8],
    limits: &PackagingLimits,
) -> Result<Vec<EntrySummary>, ArchiveError> {
    let mut tracker = QuotaTracker::new(*limits);
    let mut tar = Archive::new(GzDecoder::new(archive));
    let entries = tar
        .entries()
        .map_err(|e| ArchiveError::io("failed to read archive", e))?;

    let mut listing = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::io("failed to read archive entry", e))?;
        tracker.admit_entry()?;
        let header = entry.header();
        let path = entry
            .path()
            .map_err(|e| ArchiveError::io("failed to decode entry name", e))?
            .into_owned();
        let describe = |what: &str| format!("invalid {what} for {}", path.display());
        listing.push(EntrySummary {
            kind: header.entry_type().into(),
            size: header.size().map_err(|e| ArchiveError::io(describe("size"), e))?,
            mode: header.mode().map_err(|e| ArchiveError::io(describe("mode"), e))?,
            path,
        });
    }
    Ok(listing)
}
