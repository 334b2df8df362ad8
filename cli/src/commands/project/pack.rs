//! # tdpack Pack Command
//!
//! File: cli/src/commands/project/pack.rs
//!
//! ## Overview
//!
//! Implements `tdpack pack`, the local half of "create project":
//! 1. Load configuration (explicit file, project `.tdpack.toml`, user file).
//! 2. Run the project's pre-upload hooks in declared order, unless `--skip-hooks`.
//! 3. Pack the directory into a quota-bounded tar.gz on a blocking worker thread.
//! 4. Write the archive bytes to `--output`.
//!
//! A failing hook declared with `fail_on_error` stops the pipeline before
//! anything is packed. Nothing is written to `--output` unless packing succeeded.
//!
//! ## Examples
//!
//! ```bash
//! tdpack pack ./daily-etl --output build/daily-etl.tar.gz
//! tdpack pack ./daily-etl -o daily-etl.tar.gz --skip-hooks
//! ```
//!
use crate::common::archive::pack::pack;
use crate::common::fs::io::{ensure_dir_exists, write_bytes_to_file};
use crate::common::hooks;
use crate::core::config;
use crate::core::error::{Result, TdpackError};
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// # Pack Arguments (`PackArgs`)
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Project directory to package.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// File to write the tar.gz archive to.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Do not run the project's pre-upload hooks.
    #[arg(long)]
    pub skip_hooks: bool,
}

/// # Handle Pack Command (`handle_pack`)
///
/// ## Arguments
///
/// * `args` - Parsed `PackArgs`.
/// * `config_path` - Explicit configuration file from `--config` / `TDPACK_CONFIG`.
///
/// ## Returns
///
/// * `Err` if the directory is missing, configuration is invalid, a fail-fast
///   hook fails, packing violates a quota or safety rule, or the output cannot
///   be written.
pub async fn handle_pack(args: PackArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling pack command for {}", args.dir.display());

    if !args.dir.is_dir() {
        return Err(anyhow!(TdpackError::FileSystem(format!(
            "Project directory '{}' does not exist or is not a directory.",
            args.dir.display()
        ))));
    }

    let cfg = config::load_config(Some(&args.dir), config_path)
        .context("Failed to load tdpack configuration")?;
    let options = cfg.pack_options();
    debug!("Effective pack options: {:?}", options);

    if args.skip_hooks {
        println!("==> Skipping pre-upload hooks (--skip-hooks)");
    } else {
        let summary = hooks::run_all(&args.dir)
            .await
            .context("Pre-upload hooks failed")?;
        if !summary.reports.is_empty() {
            println!(
                "==> {} hook(s) run, {} failure(s) tolerated",
                summary.reports.len(),
                summary.tolerated_failures()
            );
        }
    }

    let dir = args.dir.clone();
    let packed = tokio::task::spawn_blocking(move || pack(&dir, &options))
        .await
        .context("Packing task did not complete")?
        .with_context(|| format!("Failed to pack {}", args.dir.display()))?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    write_bytes_to_file(&args.output, &packed.bytes)?;

    let summary = &packed.summary;
    println!(
        "==> Packed {} file(s) and {} director(ies), {} bytes of content, into {} ({} bytes)",
        summary.files,
        summary.directories,
        summary.content_bytes,
        args.output.display(),
        packed.bytes.len()
    );
    if summary.skipped_hidden > 0 {
        println!("    {} hidden entr(ies) excluded", summary.skipped_hidden);
    }
    Ok(())
}
