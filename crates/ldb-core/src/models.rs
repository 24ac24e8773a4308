//! Data models for LDB (Local Deployment Bootstrapper)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Default backend listening port
pub const DEFAULT_BACKEND_PORT: u16 = 5000;
/// Default non-privileged HTTP port (replaces 80)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default non-privileged HTTPS port (replaces 443)
pub const DEFAULT_HTTPS_PORT: u16 = 8443;

/// What a port is used for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortPurpose {
    /// The application's backend API listener
    Backend,
    /// Plain HTTP listener
    Http,
    /// TLS listener
    Https,
}

impl PortPurpose {
    /// Environment variable consumed by the launched application
    pub fn env_var(&self) -> &'static str {
        match self {
            PortPurpose::Backend => "BACKEND_PORT",
            PortPurpose::Http => "HTTP_PORT",
            PortPurpose::Https => "HTTPS_PORT",
        }
    }
}

impl std::fmt::Display for PortPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortPurpose::Backend => write!(f, "backend"),
            PortPurpose::Http => write!(f, "http"),
            PortPurpose::Https => write!(f, "https"),
        }
    }
}

/// A port number paired with its purpose, valid for one reclaim cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortSpec {
    pub port: u16,
    pub purpose: PortPurpose,
}

impl PortSpec {
    pub fn new(port: u16, purpose: PortPurpose) -> Self {
        Self { port, purpose }
    }
}

/// The resolved port set for one deployment run.
///
/// Resolution order: environment variable, then persisted settings,
/// then built-in defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployPorts {
    pub backend: u16,
    pub http: u16,
    pub https: u16,
}

impl Default for DeployPorts {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND_PORT,
            http: DEFAULT_HTTP_PORT,
            https: DEFAULT_HTTPS_PORT,
        }
    }
}

impl DeployPorts {
    /// Resolve ports from the process environment, falling back to `base`.
    pub fn resolve(base: DeployPorts) -> Self {
        Self::resolve_with(base, |var| std::env::var(var).ok())
    }

    /// Resolution with an injected environment lookup, for testing.
    pub fn resolve_with<F>(base: DeployPorts, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |purpose: PortPurpose, fallback: u16| {
            lookup(purpose.env_var())
                .and_then(|v| v.trim().parse::<u16>().ok())
                .unwrap_or(fallback)
        };

        Self {
            backend: get(PortPurpose::Backend, base.backend),
            http: get(PortPurpose::Http, base.http),
            https: get(PortPurpose::Https, base.https),
        }
    }

    /// All ports of interest, in reclaim order
    pub fn specs(&self) -> [PortSpec; 3] {
        [
            PortSpec::new(self.backend, PortPurpose::Backend),
            PortSpec::new(self.http, PortPurpose::Http),
            PortSpec::new(self.https, PortPurpose::Https),
        ]
    }

    /// Environment variables to export into the launched process
    pub fn env(&self) -> Vec<(String, String)> {
        self.specs()
            .iter()
            .map(|s| (s.purpose.env_var().to_string(), s.port.to_string()))
            .collect()
    }
}

/// Record of a launched application process.
///
/// Written once to a marker file under the workspace logs directory so an
/// operator can terminate the process later. Never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchRecord {
    /// Unique identifier for this deployment
    pub id: Uuid,
    /// Process id of the detached application process
    pub pid: u32,
    /// Path to the log file capturing combined output
    pub log_path: PathBuf,
    /// The start command that was executed
    pub command: String,
    /// Launch timestamp
    pub started_at: DateTime<Utc>,
}

impl LaunchRecord {
    pub fn new(pid: u32, log_path: PathBuf, command: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            pid,
            log_path,
            command,
            started_at: Utc::now(),
        }
    }
}
