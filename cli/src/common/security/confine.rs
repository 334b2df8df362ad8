//! # tdpack Path Confinement (`common::security::confine`)
//!
//! File: cli/src/common/security/confine.rs
//!
//! ## Overview
//!
//! Resolves a user-supplied path (a hook's `working_dir`, or an archive entry
//! name during extraction) against a containment root and proves the result
//! stays inside it. Both call sites share `confine`, so a hook and an archive
//! entry can never disagree about what "inside the root" means.
//!
//! ## Architecture
//!
//! - **`clean_path`**: purely lexical normalisation. Collapses `.`, `..` and
//!   redundant separators without touching the filesystem, so it works for
//!   paths that do not exist yet (extraction targets).
//! - **`confine`**: absolutises the root, joins relative candidates onto it,
//!   cleans *both* sides, then computes the relative path from root to
//!   candidate with `pathdiff`. A leading `..` in that relative path means
//!   the candidate escaped.
//!
//! Cleaning must precede the containment check: comparing an uncleaned
//! `root/a/../../etc` against `root` would pass a prefix test.
//!
//! The root itself is trusted as given; symlinks inside it are not resolved.
//!
use crate::core::error::ValidationError;
use std::path::{Component, Path, PathBuf};

/// Lexically normalises a path.
///
/// - `.` components are dropped.
/// - `..` removes the preceding normal component; at the filesystem root it is
///   ignored (`/..` is `/`); at the start of a relative path it is kept.
/// - An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Returns `true` if a cleaned relative path would climb out of its base.
pub fn starts_with_parent(path: &Path) -> bool {
    matches!(path.components().next(), Some(Component::ParentDir))
}

/// Resolves `candidate` against `root` and verifies containment.
///
/// # Arguments
///
/// * `candidate` - Relative or absolute path. Empty means the root itself.
/// * `root` - The containment root. Relative roots are resolved against the
///   current working directory.
///
/// # Returns
///
/// The cleaned absolute path of the candidate, which is the root itself or
/// one of its descendants.
///
/// # Errors
///
/// * `PathEscapesRoot` if the cleaned candidate lies outside the cleaned root.
/// * `UnresolvableRoot` if a relative root cannot be made absolute.
pub fn confine(candidate: impl AsRef<Path>, root: &Path) -> Result<PathBuf, ValidationError> {
    let candidate = candidate.as_ref();
    let root = clean_path(&absolutize(root)?);

    if candidate.as_os_str().is_empty() {
        return Ok(root);
    }

    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };
    let resolved = clean_path(&joined);

    let escapes = || ValidationError::PathEscapesRoot {
        path: candidate.display().to_string(),
        root: root.clone(),
    };

    let relative = pathdiff::diff_paths(&resolved, &root).ok_or_else(escapes)?;
    if relative.is_absolute() || starts_with_parent(&relative) {
        return Err(escapes());
    }

    Ok(resolved)
}

fn absolutize(path: &Path) -> Result<PathBuf, ValidationError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|_| ValidationError::UnresolvableRoot {
            root: path.to_path_buf(),
        })
}
