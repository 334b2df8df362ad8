//! # tdpack Project Pipeline Commands
//!
//! File: cli/src/commands/project/mod.rs
//!
//! ## Overview
//!
//! The "create project" and "download project" halves of the pipeline, minus
//! the network transport: `pack` writes the archive to a file and `unpack`
//! reads one from a file. `list` is a read-only look inside an archive.
//!
//! ```bash
//! tdpack pack ./daily-etl --output daily-etl.tar.gz
//! tdpack list daily-etl.tar.gz
//! tdpack unpack daily-etl.tar.gz ./restored
//! ```
//!

/// Handler and arguments for `tdpack list`.
pub mod list;
/// Handler and arguments for `tdpack pack`.
pub mod pack;
/// Handler and arguments for `tdpack unpack`.
pub mod unpack;
