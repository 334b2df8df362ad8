//! # tdpack Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates tdpack's own settings: the
//! packaging quotas and the gzip level. (Hook declarations are not tool
//! configuration; they live in each project's `.td-hooks.json`, see
//! `common::hooks::config`.)
//!
//! ## Architecture
//!
//! Configuration sources, highest precedence first:
//! 1. An explicit file from `--config <PATH>` or `TDPACK_CONFIG` (`~` is expanded).
//! 2. A project `.tdpack.toml` in the project directory or an ancestor. The
//!    search stops at the first directory containing `.git`.
//! 3. The user file `<config dir>/tdpack/config.toml`.
//! 4. Compiled defaults.
//!
//! Every field is optional and merged field by field. Validation only lets a
//! configuration *tighten* quotas: a limit above the compiled default is an error.
//!
//! ## Examples
//!
//! ```toml
//! [limits]
//! max_file_size = 10485760   # 10 MiB
//! max_file_count = 2000
//! max_entry_count = 4000
//!
//! [archive]
//! compression_level = 9
//! ```
//!
//! ```rust
//! let cfg = config::load_config(Some(project_dir), None)?;
//! let packed = archive::pack::pack(project_dir, &cfg.pack_options())?;
//! ```
//!
use crate::common::archive::limits::{
    PackagingLimits, DEFAULT_MAX_ENTRY_COUNT, DEFAULT_MAX_FILE_COUNT, DEFAULT_MAX_FILE_SIZE,
    DEFAULT_MAX_TOTAL_SIZE,
};
use crate::common::archive::pack::PackOptions;
use crate::core::error::{Result, TdpackError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project-level configuration file name. Hidden, so it is never packed.
pub const PROJECT_CONFIG_FILENAME: &str = ".tdpack.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "TDPACK_CONFIG";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Quota overrides. Unset fields fall back to the compiled defaults.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_file_size: Option<u64>,
    pub max_total_size: Option<u64>,
    pub max_file_count: Option<usize>,
    pub max_entry_count: Option<usize>,
}

/// Archive encoding settings.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// gzip level, 0 (store) to 9 (best).
    pub compression_level: Option<u32>,
}

impl Config {
    /// Effective quotas after applying overrides to the defaults.
    pub fn packaging_limits(&self) -> PackagingLimits {
        let defaults = PackagingLimits::default();
        PackagingLimits {
            max_file_size: self.limits.max_file_size.unwrap_or(defaults.max_file_size),
            max_total_size: self.limits.max_total_size.unwrap_or(defaults.max_total_size),
            max_file_count: self.limits.max_file_count.unwrap_or(defaults.max_file_count),
            max_entry_count: self.limits.max_entry_count.unwrap_or(defaults.max_entry_count),
        }
    }

    /// Effective pack options (quotas + compression level).
    pub fn pack_options(&self) -> PackOptions {
        let defaults = PackOptions::default();
        PackOptions {
            limits: self.packaging_limits(),
            compression_level: self
                .archive
                .compression_level
                .unwrap_or(defaults.compression_level),
        }
    }
}

/// Loads the merged configuration.
///
/// # Arguments
///
/// * `project_dir` - Where to start searching for `.tdpack.toml`, if anywhere.
/// * `explicit` - A file that overrides everything else (from `--config`).
///
/// # Errors
///
/// Returns an `Err` if a present file cannot be read or parsed, if the
/// explicit file does not exist, or if the merged result fails validation.
pub fn load_config(project_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = match project_dir {
        Some(dir) => load_project_config(dir)?,
        None => None,
    };
    let explicit_config = match explicit {
        Some(path) => Some(load_explicit_config(path)?),
        None => None,
    };

    let merged = merge_configs(
        merge_configs(user_config.unwrap_or_default(), project_config),
        explicit_config,
    );
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "tdpack", "tdpack") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!("User configuration file not found at {}", config_path.display());
        Ok(None)
    }
}

fn load_project_config(project_dir: &Path) -> Result<Option<Config>> {
    match find_project_config_path(project_dir)? {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!(
                "No {} found in {} or its ancestors.",
                PROJECT_CONFIG_FILENAME,
                project_dir.display()
            );
            Ok(None)
        }
    }
}

fn load_explicit_config(path: &Path) -> Result<Config> {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if !expanded.is_file() {
        return Err(anyhow!(TdpackError::Config(format!(
            "Configuration file '{}' does not exist.",
            expanded.display()
        ))));
    }
    info!("Loading configuration from: {}", expanded.display());
    load_config_from_path(&expanded)
}

fn find_project_config_path(start: &Path) -> Result<Option<PathBuf>> {
    let start = start
        .canonicalize()
        .with_context(|| format!("Failed to resolve project directory {}", start.display()))?;
    for dir in start.ancestors() {
        let candidate = dir.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return Ok(None);
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Field-wise overlay: anything set in `overlay` wins over `base`.
fn merge_configs(base: Config, overlay: Option<Config>) -> Config {
    let Some(overlay) = overlay else {
        return base;
    };
    Config {
        limits: LimitsConfig {
            max_file_size: overlay.limits.max_file_size.or(base.limits.max_file_size),
            max_total_size: overlay.limits.max_total_size.or(base.limits.max_total_size),
            max_file_count: overlay.limits.max_file_count.or(base.limits.max_file_count),
            max_entry_count: overlay.limits.max_entry_count.or(base.limits.max_entry_count),
        },
        archive: ArchiveConfig {
            compression_level: overlay
                .archive
                .compression_level
                .or(base.archive.compression_level),
        },
    }
}

fn validate_config(config: &Config) -> Result<()> {
    check_limit("max_file_size", config.limits.max_file_size, DEFAULT_MAX_FILE_SIZE)?;
    check_limit("max_total_size", config.limits.max_total_size, DEFAULT_MAX_TOTAL_SIZE)?;
    check_limit(
        "max_file_count",
        config.limits.max_file_count.map(|n| n as u64),
        DEFAULT_MAX_FILE_COUNT as u64,
    )?;
    check_limit(
        "max_entry_count",
        config.limits.max_entry_count.map(|n| n as u64),
        DEFAULT_MAX_ENTRY_COUNT as u64,
    )?;

    if let Some(level) = config.archive.compression_level {
        if level > 9 {
            return Err(anyhow!(TdpackError::Config(format!(
                "compression_level must be between 0 and 9, got {level}."
            ))));
        }
    }
    Ok(())
}

fn check_limit(name: &str, value: Option<u64>, ceiling: u64) -> Result<()> {
    match value {
        Some(0) => Err(anyhow!(TdpackError::Config(format!(
            "{name} must be greater than 0."
        )))),
        Some(v) if v > ceiling => Err(anyhow!(TdpackError::Config(format!(
            "{name} = {v} exceeds the built-in maximum of {ceiling}; configuration may only lower limits."
        )))),
        _ => Ok(()),
    }
}
