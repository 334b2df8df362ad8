//! # tdpack Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the tdpack CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! The application follows a modular command structure:
//! - The project pipeline (`pack`, `unpack`, `list`) lives in `commands::project`
//! - Hook management (`hooks run`, `hooks check`) lives in `commands::hooks`
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Run hooks, then package a workflow project
//! tdpack pack ./my-workflow --output my-workflow.tar.gz
//!
//! # Restore it somewhere else, with debug logging
//! tdpack -vv unpack my-workflow.tar.gz ./restored
//!
//! # Use a specific configuration file
//! tdpack --config ~/strict.toml pack ./my-workflow -o out.tar.gz
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to appropriate command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (project pipeline, hooks)
mod common; // Packaging building blocks (security, hooks, archive, fs, process)
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "tdpack",
    about = "Secure packaging for workflow projects",
    long_about = "Run pre-upload hooks, then pack a workflow project into a quota-bounded tar.gz,\n\
                  or safely unpack and inspect such an archive.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file overriding user and project settings.
    #[arg(long, global = true, env = crate::core::config::CONFIG_ENV_VAR, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run pre-upload hooks and pack a project directory into an archive.
    #[command(alias = "p")]
    Pack(commands::project::pack::PackArgs),
    /// Extract an archive into a destination directory.
    #[command(alias = "u")]
    Unpack(commands::project::unpack::UnpackArgs),
    /// List the entries of an archive without extracting it.
    #[command(alias = "l")]
    List(commands::project::list::ListArgs),
    /// Run or validate a project's pre-upload hooks.
    #[command(alias = "h")]
    Hooks(commands::hooks::HooksArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Pack(args) => commands::project::pack::handle_pack(args, config_path).await,
        Commands::Unpack(args) => {
            commands::project::unpack::handle_unpack(args, config_path).await
        }
        Commands::List(args) => commands::project::list::handle_list(args, config_path).await,
        Commands::Hooks(args) => commands::hooks::handle_hooks(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn tdpack_cmd() -> Command {
        Command::cargo_bin("tdpack").expect("Failed to find tdpack binary for testing")
    }

    #[test]
    fn test_main_help_flag() {
        tdpack_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("pack"))
            .stdout(predicate::str::contains("hooks"));
    }

    #[test]
    fn test_main_version_flag() {
        tdpack_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tdpack", "list", "a.tar.gz", "-vv", "--config", "/tmp/x.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_parses_aliases() {
        let cli = Cli::try_parse_from(["tdpack", "p", "dir", "-o", "out.tar.gz"]).unwrap();
        assert!(matches!(cli.command, Commands::Pack(_)));
        let cli = Cli::try_parse_from(["tdpack", "h", "check", "dir"]).unwrap();
        assert!(matches!(cli.command, Commands::Hooks(_)));
    }

    #[test]
    fn test_config_env_var_reaches_list() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("a.tar.gz");
        std::fs::write(&archive, b"unused").unwrap();

        tdpack_cmd()
            .env(crate::core::config::CONFIG_ENV_VAR, temp.path().join("missing.toml"))
            .arg("list")
            .arg(&archive)
            .assert()
            .failure()
            .stderr(predicate::str::contains("missing.toml"))
            .stderr(predicate::str::contains("does not exist"));
    }
}
