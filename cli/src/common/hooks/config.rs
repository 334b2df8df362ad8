//! # tdpack Hook Configuration (`common::hooks::config`)
//!
//! File: cli/src/common/hooks/config.rs
//!
//! ## Overview
//!
//! Declarative pre-upload hooks live in `.td-hooks.json` at the project root:
//!
//! ```json
//! {
//!   "pre_upload_hooks": [
//!     { "name": "lint", "command": ["make", "lint"], "timeout": 120,
//!       "fail_on_error": true, "working_dir": "scripts" }
//!   ]
//! }
//! ```
//!
//! ## Architecture
//!
//! - `load_config` reads the file fresh on every call (no caching). A missing
//!   file is an empty config, not an error.
//! - Every hook is validated during the load. One invalid hook fails the whole
//!   load, so a broken config never partially executes.
//! - `validate_hook` is also called again by the runner right before
//!   execution.
//!
use crate::common::security::{confine, validate_command};
use crate::core::error::{HookError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File name of the hook configuration inside a project directory.
pub const HOOKS_FILE_NAME: &str = ".td-hooks.json";

/// Timeout applied when a hook declares `0` (or omits `timeout`).
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest timeout a hook may declare.
pub const MAX_HOOK_TIMEOUT: Duration = Duration::from_secs(600);

/// A single declared pre-upload hook.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HookSpec {
    /// Display name. Must not be empty.
    pub name: String,
    /// Executable followed by its arguments; never passed through a shell.
    pub command: Vec<String>,
    /// Seconds; `0` means `DEFAULT_HOOK_TIMEOUT`.
    #[serde(default)]
    pub timeout: i64,
    /// Abort the pipeline if this hook fails (otherwise warn and continue).
    #[serde(default)]
    pub fail_on_error: bool,
    /// Working directory relative to (and confined to) the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

impl HookSpec {
    /// The deadline the runner will actually apply.
    pub fn effective_timeout(&self) -> Duration {
        match u64::try_from(self.timeout) {
            Ok(0) | Err(_) => DEFAULT_HOOK_TIMEOUT,
            Ok(secs) => Duration::from_secs(secs),
        }
    }
}

/// The parsed contents of `.td-hooks.json`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    #[serde(default)]
    pub pre_upload_hooks: Vec<HookSpec>,
}

impl HooksConfig {
    pub fn is_empty(&self) -> bool {
        self.pre_upload_hooks.is_empty()
    }
}

/// Path of the hook config for a project directory.
pub fn hooks_file_path(dir: &Path) -> PathBuf {
    dir.join(HOOKS_FILE_NAME)
}

/// Loads and validates the hook configuration of a project.
///
/// # Arguments
///
/// * `dir` - Project root. Also the containment root for working directories.
///
/// # Errors
///
/// * `HookError::ConfigRead` if the file exists but cannot be read.
/// * `HookError::ConfigParse` if the file is not valid JSON of the expected shape.
/// * `HookError::ConfigValidation` naming the first hook that fails `validate_hook`.
pub fn load_config(dir: &Path) -> Result<HooksConfig, HookError> {
    let path = hooks_file_path(dir);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No hook config at {}, nothing to run", path.display());
            return Ok(HooksConfig::default());
        }
        Err(source) => return Err(HookError::ConfigRead { path, source }),
    };

    let config: HooksConfig = serde_json::from_str(&content)
        .map_err(|source| HookError::ConfigParse {
            path: path.clone(),
            source,
        })?;

    for hook in &config.pre_upload_hooks {
        validate_hook(hook, dir).map_err(|source| HookError::ConfigValidation {
            hook: hook.name.clone(),
            source,
        })?;
    }

    info!(
        "Loaded {} pre-upload hook(s) from {}",
        config.pre_upload_hooks.len(),
        path.display()
    );
    Ok(config)
}

/// Validates a hook against a project root without running it.
///
/// Checks, in order: non-empty name, command vector, timeout range, and
/// working-directory confinement.
pub fn validate_hook(hook: &HookSpec, project_root: &Path) -> Result<(), ValidationError> {
    if hook.name.trim().is_empty() {
        return Err(ValidationError::EmptyHookName);
    }

    validate_command(hook.command.as_slice())?;

    let max = MAX_HOOK_TIMEOUT.as_secs();
    if hook.timeout < 0 || hook.timeout.unsigned_abs() > max {
        return Err(ValidationError::InvalidTimeout {
            seconds: hook.timeout,
            max,
        });
    }

    confine(hook.working_dir.as_deref().unwrap_or(""), project_root)?;
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn hook(name: &str, command: &[&str]) -> HookSpec {
        HookSpec {
            name: name.to_string(),
            command: command.iter().map(|s| s.to_string()).collect(),
            timeout: 0,
            fail_on_error: false,
            working_dir: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_parses_full_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        fs::write(
            hooks_file_path(dir.path()),
            r#"{
                "pre_upload_hooks": [
                    {"name": "lint", "command": ["make", "lint"], "timeout": 120,
                     "fail_on_error": true, "working_dir": "scripts"},
                    {"name": "fmt", "command": ["cargo", "fmt"]}
                ]
            }"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.pre_upload_hooks.len(), 2);

        let lint = &config.pre_upload_hooks[0];
        assert_eq!(lint.name, "lint");
        assert_eq!(lint.command, vec!["make", "lint"]);
        assert_eq!(lint.effective_timeout(), Duration::from_secs(120));
        assert!(lint.fail_on_error);
        assert_eq!(lint.working_dir.as_deref(), Some("scripts"));

        let fmt = &config.pre_upload_hooks[1];
        assert!(!fmt.fail_on_error);
        assert_eq!(fmt.working_dir, None);
        assert_eq!(fmt.effective_timeout(), DEFAULT_HOOK_TIMEOUT);
    }

    #[test]
    fn test_empty_object_is_empty_config() {
        let dir = tempdir().unwrap();
        fs::write(hooks_file_path(dir.path()), "{}").unwrap();
        assert!(load_config(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(hooks_file_path(dir.path()), "{ not json").unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, HookError::ConfigParse { .. }));
    }

    #[test]
    fn test_one_invalid_hook_fails_whole_load() {
        let dir = tempdir().unwrap();
        fs::write(
            hooks_file_path(dir.path()),
            r#"{"pre_upload_hooks": [
                {"name": "ok", "command": ["echo", "fine"]},
                {"name": "bad", "command": ["echo", "a && b"]}
            ]}"#,
        )
        .unwrap();
        let err = load_config(dir.path()).unwrap_err();
        match err {
            HookError::ConfigValidation { hook, source } => {
                assert_eq!(hook, "bad");
                assert!(matches!(source, ValidationError::DangerousCharacter { ch: '&', .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_hook_rules() {
        let root = tempdir().unwrap();

        assert_eq!(validate_hook(&hook("build", &["make"]), root.path()), Ok(()));

        assert_eq!(
            validate_hook(&hook("", &["make"]), root.path()),
            Err(ValidationError::EmptyHookName)
        );

        assert_eq!(
            validate_hook(&hook("empty", &[]), root.path()),
            Err(ValidationError::EmptyCommand)
        );

        let mut negative = hook("neg", &["make"]);
        negative.timeout = -1;
        assert!(matches!(
            validate_hook(&negative, root.path()),
            Err(ValidationError::InvalidTimeout { seconds: -1, .. })
        ));

        let mut too_long = hook("slow", &["make"]);
        too_long.timeout = 601;
        assert!(validate_hook(&too_long, root.path()).is_err());
        too_long.timeout = 600;
        assert_eq!(validate_hook(&too_long, root.path()), Ok(()));

        let mut escaping = hook("escape", &["make"]);
        escaping.working_dir = Some("../outside".into());
        assert!(matches!(
            validate_hook(&escaping, root.path()),
            Err(ValidationError::PathEscapesRoot { .. })
        ));

        let mut at_root = hook("root", &["make"]);
        at_root.working_dir = Some(".".into());
        assert_eq!(validate_hook(&at_root, root.path()), Ok(()));
    }
}
