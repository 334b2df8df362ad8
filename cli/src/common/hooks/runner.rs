//! # tdpack Hook Runner (`common::hooks::runner`)
//!
//! File: cli/src/common/hooks/runner.rs
//!
//! ## Overview
//!
//! Executes a project's pre-upload hooks one after another. Each hook moves
//! through `Pending -> Validated -> Running -> {Succeeded, Failed, TimedOut}`.
//!
//! ## Architecture
//!
//! - **`run_hook`**: re-validates the hook, resolves its deadline and its
//!   confined working directory, then hands the argument vector to
//!   `common::process::run_with_deadline`.
//! - **`run_all`**: loads `.td-hooks.json` fresh, then runs hooks strictly in
//!   declared order (a build step may have to precede a lint step). A failing
//!   hook with `fail_on_error = true` aborts the pipeline; otherwise the
//!   failure is reported as a warning and the next hook runs.
//!
//! Only execution failures are recoverable per hook. Validation errors always
//! abort, but `load_config` has already rejected those before anything runs.
//!
use super::config::{load_config, validate_hook, HookSpec};
use crate::common::process::{run_with_deadline, ProcessOutcome};
use crate::common::security::confine;
use crate::core::error::{ExecutionError, HookError};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Terminal state of a hook that was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Succeeded,
    Failed,
    TimedOut,
}

/// Outcome of a single hook within `run_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    pub name: String,
    pub status: HookStatus,
    pub duration: Duration,
}

/// Everything `run_all` ran, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<HookReport>,
}

impl RunSummary {
    /// Number of hooks that did not succeed but were allowed to continue.
    pub fn tolerated_failures(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status != HookStatus::Succeeded)
            .count()
    }
}

/// Runs one hook to completion.
///
/// # Arguments
///
/// * `hook` - The hook to run. Validated again here before spawning.
/// * `project_root` - Containment root for the hook's working directory.
///
/// # Errors
///
/// * `HookError::Validation` if the hook is invalid.
/// * `HookError::Execution(Spawn)` if the process cannot be started or awaited.
/// * `HookError::Execution(HookFailed)` on a non-zero exit.
/// * `HookError::Execution(HookTimedOut)` if the deadline expired; the process
///   has been killed by the time this is returned.
pub async fn run_hook(hook: &HookSpec, project_root: &Path) -> Result<(), HookError> {
    validate_hook(hook, project_root)?;

    let timeout = hook.effective_timeout();
    let cwd = confine(hook.working_dir.as_deref().unwrap_or(""), project_root)?;

    println!("==> Running hook '{}': {}", hook.name, hook.command.join(" "));
    debug!("Hook '{}' working directory: {}", hook.name, cwd.display());

    let outcome = run_with_deadline(&hook.command, &cwd, timeout)
        .await
        .map_err(|source| ExecutionError::Spawn {
            name: hook.name.clone(),
            source,
        })?;

    match outcome {
        ProcessOutcome::Exited(status) if status.success() => Ok(()),
        ProcessOutcome::Exited(status) => Err(ExecutionError::HookFailed {
            name: hook.name.clone(),
            status,
        }
        .into()),
        ProcessOutcome::TimedOut => Err(ExecutionError::HookTimedOut {
            name: hook.name.clone(),
            timeout,
        }
        .into()),
    }
}

/// Loads and runs every pre-upload hook of the project in `dir`.
///
/// A project without `.td-hooks.json` (or with an empty hook list) succeeds
/// without doing anything.
///
/// # Errors
///
/// Returns the config loading error, or the first execution error of a hook
/// declared with `fail_on_error = true`. Later hooks do not run in that case.
pub async fn run_all(dir: &Path) -> Result<RunSummary, HookError> {
    let config = load_config(dir)?;
    let mut summary = RunSummary::default();

    if config.is_empty() {
        debug!("No pre-upload hooks configured in {}", dir.display());
        return Ok(summary);
    }

    let total = config.pre_upload_hooks.len();
    info!("Running {} pre-upload hook(s) in {}", total, dir.display());

    for (index, hook) in config.pre_upload_hooks.iter().enumerate() {
        debug!("Hook {}/{}: '{}'", index + 1, total, hook.name);
        let started = Instant::now();
        let result = run_hook(hook, dir).await;
        let duration = started.elapsed();

        let status = match result {
            Ok(()) => {
                println!("==> Hook '{}' completed in {:.1?}", hook.name, duration);
                HookStatus::Succeeded
            }
            Err(HookError::Execution(err)) if !hook.fail_on_error => {
                warn!("Hook '{}' failed but fail_on_error is false: {}", hook.name, err);
                eprintln!("warning: {err} (continuing)");
                match err {
                    ExecutionError::HookTimedOut { .. } => HookStatus::TimedOut,
                    _ => HookStatus::Failed,
                }
            }
            Err(err) => return Err(err),
        };

        summary.reports.push(HookReport {
            name: hook.name.clone(),
            status,
            duration,
        });
    }

    info!(
        "Pre-upload hooks finished ({} tolerated failure(s))",
        summary.tolerated_failures()
    );
    Ok(summary)
}
