//! # tdpack Pre-Upload Hooks (`common::hooks`)
//!
//! File: cli/src/common/hooks/mod.rs
//!
//! ## Overview
//!
//! Pre-upload hooks are local commands a project declares in `.td-hooks.json`
//! to build or check itself before it is packed. This module loads, validates
//! and executes them.
//!
//! - **`config`**: `HookSpec`, `HooksConfig`, `load_config`, `validate_hook`.
//! - **`runner`**: `run_hook`, `run_all` and their reports.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::hooks;
//! # async fn run(project: &std::path::Path) -> anyhow::Result<()> {
//! let summary = hooks::run_all(project).await?;
//! println!("{} hook(s) ran", summary.reports.len());
//! # Ok(())
//! # }
//! ```
//!

pub mod config;
pub mod runner;

pub use config::{load_config, HookSpec, HOOKS_FILE_NAME};
pub use runner::run_all;
