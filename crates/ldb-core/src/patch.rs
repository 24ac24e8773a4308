//! Privileged-port patching
//!
//! Rewrites hardcoded bindings to the privileged HTTP/HTTPS ports (80 and
//! 443) in application source to environment-driven ports. This is
//! pattern-based text rewriting, not parsing; bindings expressed any other
//! way are left alone.

use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HTTP_BIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(listen\s*\(\s*)80(\s*[,)])").expect("valid pattern"));
static HTTPS_BIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(listen\s*\(\s*)443(\s*[,)])").expect("valid pattern"));

/// Outcome of a patch pass over one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Bindings were rewritten; a backup of the original was kept
    Patched { replacements: usize },
    /// No privileged-port bindings found; file untouched
    Unchanged,
}

/// Rewrite literal `listen(80)` / `listen(443)` bindings in `file` to read
/// `HTTP_PORT` / `HTTPS_PORT` from the environment, defaulting to the given
/// ports.
///
/// The original file is preserved as `<name>.orig` before the first
/// rewrite. Applying the patch to an already-patched file is a no-op, so
/// the backup always holds the true original.
pub fn patch_privileged_ports(file: &Path, http_port: u16, https_port: u16) -> Result<PatchOutcome> {
    let source = fs::read_to_string(file)?;

    let http_hits = HTTP_BIND.find_iter(&source).count();
    let https_hits = HTTPS_BIND.find_iter(&source).count();
    let replacements = http_hits + https_hits;

    if replacements == 0 {
        tracing::debug!(file = %file.display(), "no privileged-port bindings found");
        return Ok(PatchOutcome::Unchanged);
    }

    let http_replacement = format!("${{1}}process.env.HTTP_PORT || {}${{2}}", http_port);
    let https_replacement = format!("${{1}}process.env.HTTPS_PORT || {}${{2}}", https_port);

    let patched = HTTP_BIND.replace_all(&source, http_replacement.as_str());
    let patched = HTTPS_BIND.replace_all(&patched, https_replacement.as_str());

    let backup = backup_path(file);
    if !backup.exists() {
        fs::copy(file, &backup)?;
    }

    fs::write(file, patched.as_bytes())?;

    tracing::info!(
        file = %file.display(),
        replacements,
        "rewrote privileged-port bindings"
    );

    Ok(PatchOutcome::Patched { replacements })
}

fn backup_path(file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".orig");
    file.with_file_name(name)
}
