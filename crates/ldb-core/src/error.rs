//! Error types for LDB (Local Deployment Bootstrapper)

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ldb-core operations
#[derive(Error, Debug)]
pub enum LdbError {
    /// A required external tool is not installed or not in PATH
    #[error("Required tool not found: {0}")]
    ToolMissing(String),

    /// No archive exists at any of the candidate locations
    #[error("No application archive found (looked at: {0})")]
    ArchiveNotFound(String),

    /// No directory containing the backend subdirectory could be located
    #[error("Could not locate a project root containing '{0}'")]
    LayoutNotFound(String),

    /// The detected project root does not contain the backend directory
    #[error("Backend directory missing: {0}")]
    BackendMissing(PathBuf),

    /// Spawning the application process failed
    #[error("Failed to launch application: {0}")]
    LaunchFailed(String),

    /// An external command exited unsuccessfully
    #[error("Process execution failed: {0}")]
    ProcessFailed(String),

    /// No launch record marker file exists
    #[error("No launch record found at {0}")]
    RecordNotFound(PathBuf),

    /// Invalid path (e.g., non-UTF8)
    #[error("Invalid path")]
    InvalidPath,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Archive read/extract error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors for input sanitization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name length is invalid (must be 1-64 characters)
    #[error("Name must be 1-64 characters, got {0}")]
    InvalidNameLength(usize),

    /// Name contains invalid characters
    #[error("Name can only contain alphanumeric characters, underscores, hyphens, and dots")]
    InvalidNameCharacters,

    /// Input contains null byte
    #[error("Input contains null byte")]
    NullByteInInput,

    /// Empty input where non-empty is required
    #[error("Input cannot be empty")]
    EmptyInput,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDirectory,

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Config directory is not writable
    #[error("Config directory is not writable: {0}")]
    NotWritable(String),

    /// IO error during config operations
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ldb-core operations
pub type Result<T> = std::result::Result<T, LdbError>;
