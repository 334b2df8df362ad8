//! # tdpack Hooks Check Command
//!
//! File: cli/src/commands/hooks/check.rs
//!
//! ## Overview
//!
//! Implements `tdpack hooks check <DIR>`: load `.td-hooks.json` through the same
//! validation `pack` applies, then print what would run without running it.
//!
//! Example output:
//!
//! ```text
//! 2 pre-upload hook(s) in ./daily-etl/.td-hooks.json:
//!
//!   1. lint
//!      command:     sqlfluff lint queries
//!      timeout:     60s
//!      working dir: /home/me/daily-etl
//!      on failure:  continue
//!   2. build
//!   ...
//! ```
//!
use crate::common::hooks::{self, config::hooks_file_path, HookSpec};
use crate::common::security::confine;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// # Check Arguments (`CheckArgs`)
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Project directory containing `.td-hooks.json`.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

/// # Handle Hooks Check Command (`handle_check`)
///
/// ## Returns
///
/// * `Err` if the hook file cannot be read, is not valid JSON, or declares an
///   invalid hook. A missing file is fine.
pub async fn handle_check(args: CheckArgs) -> Result<()> {
    info!("Handling hooks check command for {}", args.dir.display());

    let path = hooks_file_path(&args.dir);
    let config = hooks::load_config(&args.dir)
        .with_context(|| format!("Invalid hook configuration in {}", args.dir.display()))?;

    if !path.is_file() {
        println!("No {} found in {}", hooks::HOOKS_FILE_NAME, args.dir.display());
        return Ok(());
    }

    println!(
        "{} pre-upload hook(s) in {}:",
        config.pre_upload_hooks.len(),
        path.display()
    );
    for (index, hook) in config.pre_upload_hooks.iter().enumerate() {
        print!("{}", describe_hook(index + 1, hook, &args.dir)?);
    }
    Ok(())
}

fn describe_hook(position: usize, hook: &HookSpec, project_root: &Path) -> Result<String> {
    let working_dir = confine(hook.working_dir.as_deref().unwrap_or(""), project_root)?;
    let on_failure = if hook.fail_on_error { "abort" } else { "continue" };
    Ok(format!(
        "\n  {position}. {}\n     command:     {}\n     timeout:     {}s\n     working dir: {}\n     on failure:  {on_failure}\n",
        hook.name,
        hook.command.join(" "),
        hook.effective_timeout().as_secs(),
        working_dir.display(),
    ))
}
