//! # tdpack Security Guards (`common::security`)
//!
//! File: cli/src/common/security/mod.rs
//!
//! ## Overview
//!
//! Stateless guards shared by the hook runner and the archive unpacker:
//!
//! - **`command`**: rejects unsafe hook command vectors (length limits, shell
//!   metacharacters, traversal in the executable name).
//! - **`confine`**: resolves a path against a containment root and rejects
//!   anything that escapes it. Used for hook working directories and for every
//!   archive entry written during extraction.
//!
//! Both are plain functions taking all inputs explicitly, so they can be used
//! concurrently from any call site.
//!

/// Hook command vector validation (`validate_command`).
pub mod command;
/// Lexical path cleaning and root containment (`clean_path`, `confine`).
pub mod confine;

pub use command::validate_command;
pub use confine::{clean_path, confine};
