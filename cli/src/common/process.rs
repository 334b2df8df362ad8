//! # tdpack Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! This module provides the single primitive tdpack uses to run external
//! programs: spawn an argument vector directly (no shell), inherit the
//! terminal's stdout/stderr, and enforce a hard deadline.
//!
//! ## Architecture
//!
//! - The argument vector is handed to `tokio::process::Command` as program +
//!   args. It is never joined into a string, so nothing is re-parsed by a shell.
//! - The wait is wrapped in `tokio::time::timeout`. When the deadline expires
//!   the child receives a kill signal and is reaped before returning, so no
//!   zombie or orphan outlives the call.
//! - `kill_on_drop(true)` covers the case where the calling future itself is
//!   dropped mid-wait.
//! - Standard input is the null device; hooks are non-interactive.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{run_with_deadline, ProcessOutcome};
//! # async fn run() -> std::io::Result<()> {
//! let argv = vec!["make".to_string(), "lint".to_string()];
//! match run_with_deadline(&argv, Path::new("."), Duration::from_secs(60)).await? {
//!     ProcessOutcome::Exited(status) if status.success() => println!("ok"),
//!     ProcessOutcome::Exited(status) => println!("failed: {status}"),
//!     ProcessOutcome::TimedOut => println!("killed after deadline"),
//! }
//! # Ok(())
//! # }
//! ```
//!
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// How a deadline-bound process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process exited on its own before the deadline.
    Exited(ExitStatus),
    /// The deadline expired; the process was killed and reaped.
    TimedOut,
}

/// Runs `argv` in `cwd`, killing it if it outlives `timeout`.
///
/// # Arguments
///
/// * `argv` - Program followed by its arguments. Passed verbatim to the OS.
/// * `cwd` - Working directory for the child.
/// * `timeout` - Hard deadline measured from spawn.
///
/// # Errors
///
/// Returns an `io::Error` if `argv` is empty, the program cannot be spawned
/// (not found, not executable, bad `cwd`), or waiting on / killing the child fails.
pub async fn run_with_deadline(
    argv: &[String],
    cwd: &Path,
    timeout: Duration,
) -> io::Result<ProcessOutcome> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

    debug!(
        "Spawning {:?} with {} argument(s) in {:?} (deadline {:?})",
        program,
        args.len(),
        cwd,
        timeout
    );

    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()?;

    let started = Instant::now();
    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => {
            let status = status?;
            debug!("{:?} exited with {} after {:?}", program, status, started.elapsed());
            Ok(ProcessOutcome::Exited(status))
        }
        Err(_elapsed) => {
            warn!("{:?} exceeded its {:?} deadline, killing it", program, timeout);
            // `kill` sends the signal and then waits, so the child is reaped here.
            child.kill().await?;
            Ok(ProcessOutcome::TimedOut)
        }
    }
}
