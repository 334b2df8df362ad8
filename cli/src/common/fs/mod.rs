//! # tdpack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Entry point for filesystem helpers. Everything lives in `io`: directory
//! creation, whole-file reads and writes with error context, and the
//! link-refusing open/create primitives used by the archive layer.
//!
//! Import from the submodule directly, e.g. `crate::common::fs::io::ensure_dir_exists`.
//!

/// Basic file I/O and link-safe open/create helpers.
pub mod io;
