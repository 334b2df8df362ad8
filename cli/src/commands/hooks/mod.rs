//! # tdpack Hooks Command Group
//!
//! File: cli/src/commands/hooks/mod.rs
//!
//! ## Overview
//!
//! Router for `tdpack hooks`. Hooks are declared in the project's
//! `.td-hooks.json` and normally run as the first stage of `tdpack pack`;
//! these subcommands expose that stage on its own.
//!
//! ## Architecture
//!
//! - `HooksArgs`: Top-level arguments for the command group.
//! - `HooksCommand`: Enum of the subcommands (`run`, `check`).
//! - `handle_hooks`: Dispatches to the subcommand handler.
//!
//! ## Examples
//!
//! ```bash
//! # Validate the hook file without executing anything
//! tdpack hooks check ./daily-etl
//!
//! # Run the hooks exactly as `pack` would
//! tdpack hooks run ./daily-etl
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Contains the handler and arguments for `tdpack hooks check`.
mod check;
/// Contains the handler and arguments for `tdpack hooks run`.
mod run;

/// # Hooks Command Group Arguments (`HooksArgs`)
#[derive(Parser, Debug)]
pub struct HooksArgs {
    #[command(subcommand)]
    command: HooksCommand,
}

/// # Hooks Subcommands (`HooksCommand`)
#[derive(Subcommand, Debug)]
enum HooksCommand {
    /// Run the pre-upload hooks of a project in declared order.
    Run(run::RunArgs),
    /// Load and validate the hook file without running any hook.
    Check(check::CheckArgs),
}

/// # Handle Hooks Command (`handle_hooks`)
///
/// Dispatches to the selected subcommand handler and propagates its result.
pub async fn handle_hooks(args: HooksArgs) -> Result<()> {
    match args.command {
        HooksCommand::Run(args) => run::handle_run(args).await?,
        HooksCommand::Check(args) => check::handle_check(args).await?,
    }
    Ok(())
}
