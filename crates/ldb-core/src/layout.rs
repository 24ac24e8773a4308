//! Project layout detection
//!
//! Archive tools vary in whether they wrap contents in a synthetic top-level
//! folder, so the effective project root of an extracted tree is not fixed.
//! Detection checks shallowest-first to avoid false positives from deeper,
//! unrelated matches.

use crate::error::{LdbError, Result};
use crate::validation::validate_backend_dir_name;
use std::fs;
use std::path::{Path, PathBuf};

/// Locate the effective project root of an extracted archive.
///
/// Ordered, first match wins:
///
/// 1. `root` directly contains the backend subdirectory (flat archive).
/// 2. `root` has exactly one immediate subdirectory and that subdirectory
///    contains the backend subdirectory (single wrapping folder).
/// 3. Any immediate subdirectory of `root` contains the backend
///    subdirectory; the first such subdirectory in name order wins.
/// 4. Otherwise the layout is undetectable.
///
/// # Examples
///
/// ```no_run
/// use ldb_core::layout::detect_project_root;
/// use std::path::Path;
///
/// // workspace/myapp/backend/... resolves to workspace/myapp
/// let root = detect_project_root(Path::new("workspace"), "backend").unwrap();
/// ```
pub fn detect_project_root(root: &Path, backend_dir: &str) -> Result<PathBuf> {
    validate_backend_dir_name(backend_dir)?;

    if root.join(backend_dir).is_dir() {
        tracing::debug!(root = %root.display(), "backend found at depth 0");
        return Ok(root.to_path_buf());
    }

    let subdirs = immediate_subdirs(root)?;

    if subdirs.len() == 1 && subdirs[0].join(backend_dir).is_dir() {
        tracing::debug!(root = %subdirs[0].display(), "backend found under single wrapper");
        return Ok(subdirs[0].clone());
    }

    for sub in &subdirs {
        if sub.join(backend_dir).is_dir() {
            tracing::debug!(root = %sub.display(), "backend found at depth 2");
            return Ok(sub.clone());
        }
    }

    Err(LdbError::LayoutNotFound(backend_dir.to_string()))
}

/// Immediate subdirectories of `root`, sorted by name for deterministic
/// detection across filesystems.
fn immediate_subdirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}
