//! Environment file and TLS provisioning
//!
//! Best-effort steps run against the detected project root before launch.
//! Failures here are reported to the caller, which logs and continues.

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Environment file consumed by the application
pub const ENV_FILE: &str = ".env";
/// Template shipped with the archive
pub const ENV_EXAMPLE_FILE: &str = ".env.example";

/// TLS certificate file name
pub const CERT_FILE: &str = "cert.pem";
/// TLS private key file name
pub const KEY_FILE: &str = "key.pem";
/// Directory inside the project root that receives TLS material
pub const CERTS_DIR: &str = "certs";

/// Outcome of a provisioning step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Files were put in place
    Provisioned,
    /// Nothing to do; inputs already present or absent
    Skipped,
}

/// Copy `.env.example` to `.env` when the application ships a template but
/// no environment file.
pub fn provision_env_file(project_root: &Path) -> Result<ProvisionOutcome> {
    let env_path = project_root.join(ENV_FILE);
    let example_path = project_root.join(ENV_EXAMPLE_FILE);

    if env_path.exists() || !example_path.is_file() {
        return Ok(ProvisionOutcome::Skipped);
    }

    fs::copy(&example_path, &env_path)?;
    tracing::info!(path = %env_path.display(), "created environment file from example");

    Ok(ProvisionOutcome::Provisioned)
}

/// Copy TLS material from `source_dir` into `<project_root>/certs/`.
///
/// Both certificate and key must be present; a partial pair is treated as
/// missing material.
pub fn provision_tls(source_dir: &Path, project_root: &Path) -> Result<ProvisionOutcome> {
    let cert = source_dir.join(CERT_FILE);
    let key = source_dir.join(KEY_FILE);

    if !cert.is_file() || !key.is_file() {
        tracing::debug!(dir = %source_dir.display(), "no TLS material to provision");
        return Ok(ProvisionOutcome::Skipped);
    }

    let certs_dir = project_root.join(CERTS_DIR);
    fs::create_dir_all(&certs_dir)?;

    fs::copy(&cert, certs_dir.join(CERT_FILE))?;
    fs::copy(&key, certs_dir.join(KEY_FILE))?;

    tracing::info!(dest = %certs_dir.display(), "TLS material provisioned");

    Ok(ProvisionOutcome::Provisioned)
}
