//! Configuration management for LDB
//!
//! Handles loading, saving, and managing persisted bootstrapper settings
//! with support for atomic saves and platform-specific paths.

use crate::error::{ConfigError, Result};
use crate::models::{DeployPorts, DEFAULT_BACKEND_PORT, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Current config version for migrations
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default grace period between graceful and forced termination, in milliseconds
const DEFAULT_GRACE_PERIOD_MS: u64 = 1000;

fn default_grace_period() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

fn default_backend_dir() -> String {
    "backend".to_string()
}

fn default_start_command() -> String {
    "npm start".to_string()
}

fn default_backend_port() -> u16 {
    DEFAULT_BACKEND_PORT
}

fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn default_https_port() -> u16 {
    DEFAULT_HTTPS_PORT
}

fn default_archive_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("app.zip"),
        PathBuf::from("release/app.zip"),
        PathBuf::from("dist/app.zip"),
    ]
}

fn default_config_version() -> u32 {
    CURRENT_CONFIG_VERSION
}

/// Persisted bootstrapper settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Config version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    /// Name of the backend subdirectory that marks the project root
    #[serde(default = "default_backend_dir")]
    pub backend_dir: String,
    /// Shell command that starts the application
    #[serde(default = "default_start_command")]
    pub start_command: String,
    /// Grace period between graceful and forced termination, in milliseconds
    #[serde(default = "default_grace_period")]
    pub grace_period_ms: u64,
    /// Default backend listening port (env `BACKEND_PORT` wins)
    #[serde(default = "default_backend_port")]
    pub backend_port: u16,
    /// Default HTTP listening port (env `HTTP_PORT` wins)
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Default HTTPS listening port (env `HTTPS_PORT` wins)
    #[serde(default = "default_https_port")]
    pub https_port: u16,
    /// Candidate archive locations, resolved relative to the workspace
    #[serde(default = "default_archive_candidates")]
    pub archive_candidates: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION,
            backend_dir: default_backend_dir(),
            start_command: default_start_command(),
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            backend_port: DEFAULT_BACKEND_PORT,
            http_port: DEFAULT_HTTP_PORT,
            https_port: DEFAULT_HTTPS_PORT,
            archive_candidates: default_archive_candidates(),
        }
    }
}

impl Settings {
    /// The port set configured here, before environment overrides
    pub fn ports(&self) -> DeployPorts {
        DeployPorts {
            backend: self.backend_port,
            http: self.http_port,
            https: self.https_port,
        }
    }
}

/// Manages the persisted settings file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Directory where the settings file is stored
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with an explicit directory.
    ///
    /// This is the primary constructor, supporting dependency injection
    /// for testing without environment variable manipulation.
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a ConfigManager using platform-specific default directories.
    ///
    /// - macOS: ~/Library/Application Support/ldb/
    /// - Linux: $XDG_CONFIG_HOME/ldb/
    /// - Windows: %APPDATA%\ldb\
    pub fn with_defaults() -> std::result::Result<Self, ConfigError> {
        // Check for override environment variable (useful for CLI testing)
        if let Ok(override_path) = std::env::var("LDB_CONFIG_HOME") {
            return Ok(Self {
                config_dir: PathBuf::from(override_path),
            });
        }

        let project_dirs =
            ProjectDirs::from("", "", "ldb").ok_or(ConfigError::NoConfigDirectory)?;

        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }

    /// Load settings from disk.
    ///
    /// If the settings file doesn't exist, returns defaults.
    pub fn load(&self) -> Result<Settings> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let mut settings: Settings =
            serde_json::from_str(&contents).map_err(ConfigError::ParseError)?;

        self.migrate(&mut settings)?;

        Ok(settings)
    }

    /// Save settings to disk atomically.
    ///
    /// Uses a write-to-temp-then-rename strategy to prevent corruption
    /// if the process is interrupted during write.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.ensure_directories()?;

        let config_path = self.config_path();
        let temp_path = config_path.with_extension("json.tmp");

        let contents = serde_json::to_string_pretty(settings).map_err(ConfigError::ParseError)?;
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &config_path)?;

        Ok(())
    }

    fn migrate(&self, settings: &mut Settings) -> Result<()> {
        if settings.config_version < CURRENT_CONFIG_VERSION {
            settings.config_version = CURRENT_CONFIG_VERSION;
        }
        Ok(())
    }

    /// Check if the config directory is writable
    pub fn is_config_dir_writable(&self) -> bool {
        if self.ensure_directories().is_err() {
            return false;
        }

        let test_file = self.config_dir.join(".write_test");
        if fs::write(&test_file, "test").is_ok() {
            let _ = fs::remove_file(&test_file);
            true
        } else {
            false
        }
    }
}
