//! # tdpack Unpack Command
//!
//! File: cli/src/commands/project/unpack.rs
//!
//! ## Overview
//!
//! Implements `tdpack unpack`, the local half of "download project": read the
//! archive bytes from a file and extract them under `DEST` with the same quotas
//! `pack` uses. Every entry name is confined to `DEST`; link entries abort the
//! extraction.
//!
//! A failed extraction leaves no half-written tree behind when `DEST` did not
//! exist beforehand: the directory is removed again. An existing `DEST` is left
//! alone, since it may hold unrelated files.
//!
//! ## Examples
//!
//! ```bash
//! tdpack unpack daily-etl.tar.gz ./restored
//! ```
//!
use crate::common::archive::unpack::unpack;
use crate::common::fs::io::read_file_bytes;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// # Unpack Arguments (`UnpackArgs`)
#[derive(Parser, Debug)]
pub struct UnpackArgs {
    /// The tar.gz archive to extract.
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory. Created if missing.
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,
}

/// # Handle Unpack Command (`handle_unpack`)
///
/// Only the user and explicit configuration files apply here: there is no
/// project directory to search for `.tdpack.toml` yet.
pub async fn handle_unpack(args: UnpackArgs, config_path: Option<&Path>) -> Result<()> {
    info!(
        "Handling unpack command: {} -> {}",
        args.archive.display(),
        args.dest.display()
    );

    let cfg = config::load_config(None, config_path)
        .context("Failed to load tdpack configuration")?;
    let limits = cfg.packaging_limits();
    debug!("Effective limits: {:?}", limits);

    let bytes = read_file_bytes(&args.archive)?;
    let dest_existed = args.dest.exists();

    let dest = args.dest.clone();
    let result = tokio::task::spawn_blocking(move || unpack(&bytes, &dest, &limits))
        .await
        .context("Unpacking task did not complete")?;

    let summary = match result {
        Ok(summary) => summary,
        Err(err) => {
            if !dest_existed {
                discard_partial_output(&args.dest);
            }
            return Err(err)
                .with_context(|| format!("Failed to unpack {}", args.archive.display()));
        }
    };

    println!(
        "==> Unpacked {} file(s) and {} director(ies), {} bytes, into {}",
        summary.files,
        summary.directories,
        summary.content_bytes,
        args.dest.display()
    );
    if summary.skipped > 0 {
        println!("    {} unsupported entr(ies) skipped", summary.skipped);
    }
    Ok(())
}

fn discard_partial_output(dest: &Path) {
    if !dest.exists() {
        return;
    }
    match fs::remove_dir_all(dest) {
        Ok(()) => debug!("Removed partially extracted {}", dest.display()),
        Err(e) => warn!(
            "Could not remove partially extracted {}: {}",
            dest.display(),
            e
        ),
    }
}
