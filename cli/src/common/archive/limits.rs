//! # tdpack Packaging Quotas (`common::archive::limits`)
//!
//! File: cli/src/common/archive/limits.rs
//!
//! ## Overview
//!
//! Hard quotas enforced while packing and again while unpacking. An archive is
//! never trusted to have been produced by our own packer, so the unpacker
//! re-checks everything even though the packer already did.
//!
//! ## Architecture
//!
//! - **`PackagingLimits`**: immutable limits (per-file size, total size, file
//!   count, entry count).
//! - **`QuotaTracker`**: running counters for one pack or unpack call. Every
//!   archive entry counts against the entry cap, whatever its type; only
//!   regular files count against the file cap.
//! - **`QuotaReader`**: a `Read` adapter placed between the content source and
//!   its sink. It charges every byte that flows through it to the tracker and
//!   fails the read the moment a quota is exceeded, instead of checking after
//!   the fact.
//!
//! `QuotaReader` reports quota violations as `io::Error`s wrapping a
//! `ResourceLimitError`; `limit_error` recovers the typed error on the other side.
//!
use crate::core::error::ResourceLimitError;
use std::io::{self, Read};

/// Default largest single file: 100 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Default largest archive payload (sum of file sizes): 500 MiB.
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;
/// Default maximum number of regular files.
pub const DEFAULT_MAX_FILE_COUNT: usize = 10_000;
/// Default maximum number of archive entries of any type (files, directories, ...).
pub const DEFAULT_MAX_ENTRY_COUNT: usize = 20_000;

/// Quotas applied to a single pack or unpack call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagingLimits {
    pub max_file_size: u64,
    pub max_total_size: u64,
    pub max_file_count: usize,
    pub max_entry_count: usize,
}

impl Default for PackagingLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            max_entry_count: DEFAULT_MAX_ENTRY_COUNT,
        }
    }
}

/// Running counters for one pass over a tree or an archive.
#[derive(Debug)]
pub struct QuotaTracker {
    limits: PackagingLimits,
    entries: usize,
    files: usize,
    total_bytes: u64,
}

impl QuotaTracker {
    pub fn new(limits: PackagingLimits) -> Self {
        Self {
            limits,
            entries: 0,
            files: 0,
            total_bytes: 0,
        }
    }

    pub fn limits(&self) -> &PackagingLimits {
        &self.limits
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn files(&self) -> usize {
        self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Counts one more archive entry of any type against the entry cap.
    pub fn admit_entry(&mut self) -> Result<(), ResourceLimitError> {
        self.entries += 1;
        if self.entries > self.limits.max_entry_count {
            return Err(ResourceLimitError::TooManyEntries {
                max: self.limits.max_entry_count,
            });
        }
        Ok(())
    }

    /// Counts one more regular file and checks its declared size.
    ///
    /// The declared size comes from filesystem metadata (packing) or the tar
    /// header (unpacking). Actual bytes are charged separately by `QuotaReader`,
    /// since a header may lie.
    pub fn admit_file(&mut self, path: &str, declared_size: u64) -> Result<(), ResourceLimitError> {
        self.files += 1;
        if self.files > self.limits.max_file_count {
            return Err(ResourceLimitError::TooManyFiles {
                max: self.limits.max_file_count,
            });
        }
        if declared_size > self.limits.max_file_size {
            return Err(ResourceLimitError::FileTooLarge {
                path: path.to_string(),
                size: declared_size,
                max: self.limits.max_file_size,
            });
        }
        Ok(())
    }

    /// Charges `n` content bytes against the total-size quota.
    pub fn charge(&mut self, n: u64) -> Result<(), ResourceLimitError> {
        self.total_bytes = self.total_bytes.saturating_add(n);
        if self.total_bytes > self.limits.max_total_size {
            return Err(ResourceLimitError::ArchiveTooLarge {
                max: self.limits.max_total_size,
            });
        }
        Ok(())
    }
}

/// `Read` adapter that enforces the per-file and total-size quotas on the
/// bytes actually flowing through it.
pub struct QuotaReader<'a, R> {
    inner: R,
    tracker: &'a mut QuotaTracker,
    path: &'a str,
    bytes_read: u64,
}

impl<'a, R: Read> QuotaReader<'a, R> {
    pub fn new(inner: R, tracker: &'a mut QuotaTracker, path: &'a str) -> Self {
        Self {
            inner,
            tracker,
            path,
            bytes_read: 0,
        }
    }

    /// Bytes of this file that have passed through so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for QuotaReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;

        let max = self.tracker.limits().max_file_size;
        if self.bytes_read > max {
            return Err(io::Error::other(ResourceLimitError::FileTooLarge {
                path: self.path.to_string(),
                size: self.bytes_read,
                max,
            }));
        }
        self.tracker.charge(n as u64).map_err(io::Error::other)?;
        Ok(n)
    }
}

/// Extracts a quota violation raised by `QuotaReader` from an I/O error.
pub fn limit_error(err: &io::Error) -> Option<ResourceLimitError> {
    err.get_ref()?
        .downcast_ref::<ResourceLimitError>()
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_file_size: u64, max_total_size: u64, max_file_count: usize) -> PackagingLimits {
        PackagingLimits {
            max_file_size,
            max_total_size,
            max_file_count,
            ..PackagingLimits::default()
        }
    }

    #[test]
    fn test_admit_entry_counts_every_entry() {
        let mut tracker = QuotaTracker::new(PackagingLimits {
            max_entry_count: 2,
            ..PackagingLimits::default()
        });
        tracker.admit_entry().unwrap();
        tracker.admit_entry().unwrap();
        assert_eq!(tracker.entries(), 2);
        assert_eq!(
            tracker.admit_entry(),
            Err(ResourceLimitError::TooManyEntries { max: 2 })
        );
        assert_eq!(tracker.files(), 0);
    }

    #[test]
    fn test_admit_file_counts() {
        let mut tracker = QuotaTracker::new(limits(100, 1000, 2));
        tracker.admit_file("a", 1).unwrap();
        tracker.admit_file("b", 1).unwrap();
        assert_eq!(
            tracker.admit_file("c", 1),
            Err(ResourceLimitError::TooManyFiles { max: 2 })
        );
    }

    #[test]
    fn test_admit_file_declared_size() {
        let mut tracker = QuotaTracker::new(limits(10, 1000, 5));
        tracker.admit_file("ok", 10).unwrap();
        assert!(matches!(
            tracker.admit_file("big", 11),
            Err(ResourceLimitError::FileTooLarge { size: 11, max: 10, .. })
        ));
    }

    #[test]
    fn test_reader_passes_data_within_limits() {
        let mut tracker = QuotaTracker::new(limits(10, 100, 5));
        let mut out = Vec::new();
        {
            let mut reader = QuotaReader::new(&b"hello"[..], &mut tracker, "f");
            io::copy(&mut reader, &mut out).unwrap();
            assert_eq!(reader.bytes_read(), 5);
        }
        assert_eq!(out, b"hello");
        assert_eq!(tracker.total_bytes(), 5);
    }

    #[test]
    fn test_reader_rejects_oversized_stream() {
        let mut tracker = QuotaTracker::new(limits(4, 100, 5));
        let mut reader = QuotaReader::new(&b"hello"[..], &mut tracker, "f");
        let err = io::copy(&mut reader, &mut io::sink()).unwrap_err();
        assert!(matches!(
            limit_error(&err),
            Some(ResourceLimitError::FileTooLarge { max: 4, .. })
        ));
    }

    #[test]
    fn test_reader_rejects_cumulative_overflow() {
        let mut tracker = QuotaTracker::new(limits(10, 8, 5));
        {
            let mut first = QuotaReader::new(&b"12345"[..], &mut tracker, "a");
            io::copy(&mut first, &mut io::sink()).unwrap();
        }
        let mut second = QuotaReader::new(&b"67890"[..], &mut tracker, "b");
        let err = io::copy(&mut second, &mut io::sink()).unwrap_err();
        assert_eq!(
            limit_error(&err),
            Some(ResourceLimitError::ArchiveTooLarge { max: 8 })
        );
    }

    #[test]
    fn test_limit_error_ignores_plain_io_errors() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert_eq!(limit_error(&err), None);
    }
}
