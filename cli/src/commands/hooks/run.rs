//! # tdpack Hooks Run Command
//!
//! File: cli/src/commands/hooks/run.rs
//!
//! Implements `tdpack hooks run <DIR>`: the hook stage of `pack` on its own,
//! with the same ordering and `fail_on_error` semantics.
//!
use crate::common::hooks;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// # Run Arguments (`RunArgs`)
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Project directory containing `.td-hooks.json`.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// # Handle Hooks Run Command (`handle_run`)
pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling hooks run command for {}", args.dir.display());

    let summary = hooks::run_all(&args.dir)
        .await
        .context("Pre-upload hooks failed")?;

    if summary.reports.is_empty() {
        println!("No pre-upload hooks configured in {}", args.dir.display());
    } else {
        println!(
            "==> {} hook(s) run, {} failure(s) tolerated",
            summary.reports.len(),
            summary.tolerated_failures()
        );
    }
    Ok(())
}
