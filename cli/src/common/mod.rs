//! # tdpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks of the packaging pipeline. Command handlers under
//! `commands::` compose these; nothing here parses CLI arguments or prints
//! tables.
//!
//! ## Architecture
//!
//! - **`security`**: pure guards. Command vector validation and path confinement.
//! - **`process`**: subprocess execution without a shell, bounded by a deadline.
//! - **`hooks`**: `.td-hooks.json` loading/validation and sequential hook execution.
//! - **`archive`**: quota-bounded tar+gzip packing, unpacking and listing.
//! - **`fs`**: file I/O helpers and link-refusing open/create primitives.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{archive, hooks};
//! use crate::core::error::Result;
//! use std::path::Path;
//!
//! # async fn run_example() -> Result<()> {
//! let project = Path::new("./my-workflow");
//! hooks::run_all(project).await?;
//! let packed = archive::pack::pack(project, &archive::pack::PackOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!

/// Tar+gzip packing and unpacking under quotas.
pub mod archive;
/// Filesystem helpers (I/O with context, link-safe open/create).
pub mod fs;
/// Pre-upload hook configuration and execution.
pub mod hooks;
/// Deadline-bound subprocess execution.
pub mod process;
/// Command validation and path confinement.
pub mod security;
