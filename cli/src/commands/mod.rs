//! # tdpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the command handlers that make up the tdpack CLI and
//! exposes them to `main.rs`.
//!
//! ## Command Groups
//!
//! - `project`: the packaging pipeline proper. `pack` (hooks, then archive),
//!   `unpack` and `list`. These are top-level commands, so `main.rs` routes to
//!   each submodule directly.
//! - `hooks`: `hooks run` and `hooks check`, a subcommand group dispatched by
//!   `handle_hooks`.
//!
//! Each command defines its own arguments struct and an async handler that
//! returns `core::error::Result<()>`.
//!

/// `tdpack hooks run|check`.
pub mod hooks;
/// `tdpack pack|unpack|list`.
pub mod project;
