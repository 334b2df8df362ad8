//! # tdpack Command Validation (`common::security::command`)
//!
//! File: cli/src/common/security/command.rs
//!
//! ## Overview
//!
//! Pure guard applied to every hook command vector before it is allowed near
//! process creation. Hooks are executed without a shell, but the hook script
//! or downstream tooling may still re-interpret its arguments, so shell
//! metacharacters are rejected outright.
//!
//! Rules, checked in this order:
//! 1. The vector must not be empty (`EmptyCommand`).
//! 2. No argument may exceed `MAX_ARG_LEN` characters (`ArgumentTooLong`).
//! 3. No argument may contain a character from `DANGEROUS_CHARS` (`DangerousCharacter`).
//! 4. The executable (`command[0]`) must not contain `..` (`UnsafeExecutablePath`).
//!
use crate::core::error::ValidationError;

/// Maximum length of a single command argument, in characters.
pub const MAX_ARG_LEN: usize = 1000;

/// Characters that are never allowed in any argument.
pub const DANGEROUS_CHARS: &[char] = &[';', '|', '&', '$', '`', '\n', '\r'];

/// Validates a hook command vector.
///
/// Has no side effects and holds no state, so it is safe to call from anywhere.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered, in the rule order listed
/// in the module documentation.
pub fn validate_command<S: AsRef<str>>(command: &[S]) -> Result<(), ValidationError> {
    let Some(executable) = command.first() else {
        return Err(ValidationError::EmptyCommand);
    };

    for (index, arg) in command.iter().enumerate() {
        let arg = arg.as_ref();
        let len = arg.chars().count();
        if len > MAX_ARG_LEN {
            return Err(ValidationError::ArgumentTooLong {
                index,
                len,
                max: MAX_ARG_LEN,
            });
        }
        if let Some(ch) = arg.chars().find(|c| DANGEROUS_CHARS.contains(c)) {
            return Err(ValidationError::DangerousCharacter { index, ch });
        }
    }

    if executable.as_ref().contains("..") {
        return Err(ValidationError::UnsafeExecutablePath {
            path: executable.as_ref().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_command() {
        assert_eq!(validate_command(&["echo", "hello"]), Ok(()));
        assert_eq!(validate_command(&["./scripts/build.sh", "--release"]), Ok(()));
    }

    #[test]
    fn test_rejects_empty_command() {
        let empty: [&str; 0] = [];
        assert_eq!(validate_command(&empty), Err(ValidationError::EmptyCommand));
    }

    #[test]
    fn test_rejects_every_dangerous_character() {
        for ch in DANGEROUS_CHARS {
            let arg = format!("hello{ch}world");
            let result = validate_command(&["echo".to_string(), arg]);
            assert_eq!(
                result,
                Err(ValidationError::DangerousCharacter { index: 1, ch: *ch }),
                "character {ch:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_injection_attempt() {
        let result = validate_command(&["echo", "hello;rm -rf /"]);
        assert!(matches!(
            result,
            Err(ValidationError::DangerousCharacter { ch: ';', .. })
        ));
    }

    #[test]
    fn test_rejects_traversal_in_executable() {
        assert_eq!(
            validate_command(&["../bin/evil"]),
            Err(ValidationError::UnsafeExecutablePath {
                path: "../bin/evil".into()
            })
        );
    }

    #[test]
    fn test_dotdot_allowed_in_later_arguments() {
        // Only the executable is checked for `..`.
        assert_eq!(validate_command(&["ls", "../sibling"]), Ok(()));
    }

    #[test]
    fn test_argument_length_boundary() {
        let at_limit = "a".repeat(MAX_ARG_LEN);
        assert_eq!(validate_command(&["echo".to_string(), at_limit]), Ok(()));

        let over = "a".repeat(MAX_ARG_LEN + 1);
        assert_eq!(
            validate_command(&["echo".to_string(), over]),
            Err(ValidationError::ArgumentTooLong {
                index: 1,
                len: 1001,
                max: MAX_ARG_LEN
            })
        );
    }
}
