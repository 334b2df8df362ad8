//! # tdpack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command: the error taxonomy and the
//! tool configuration loader.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation (`.tdpack.toml`).
//! - `error`: Typed error enums for each failure class plus the `anyhow`-backed
//!   `Result` alias used by command handlers.
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, TdpackError}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
