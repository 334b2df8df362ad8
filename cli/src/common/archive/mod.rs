//! # tdpack Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Packing and unpacking of workflow project archives. The format is a single
//! gzip member wrapping a tar stream, produced and consumed as an in-memory
//! byte buffer; the upload/download transport is someone else's job.
//!
//! ## Architecture
//!
//! - **`limits`**: `PackagingLimits`, the running `QuotaTracker` and the
//!   `QuotaReader` layer that enforces quotas on bytes as they flow.
//!   Every entry counts against an entry cap, not only regular files.
//! - **`pack`**: directory tree -> tar.gz bytes (no symlinks, no hidden entries).
//! - **`unpack`**: tar.gz bytes -> directory tree (no links, no escaping paths).
//! - **`inspect`**: read-only entry listing.
//!
//! Pack and unpack enforce the same quotas independently: an archive arriving
//! from the network is never assumed to come from `pack`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{limits::PackagingLimits, pack, unpack};
//! # fn run() -> anyhow::Result<()> {
//! let limits = PackagingLimits::default();
//! let packed = pack::pack(Path::new("./project"), &limits.into())?;
//! unpack::unpack(&packed.bytes, Path::new("./restored"), &limits)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod inspect;
pub mod limits;
pub mod pack;
pub mod unpack;
