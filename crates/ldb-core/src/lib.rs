//! LDB Core Library
//!
//! This crate provides the core functionality for LDB (Local Deployment
//! Bootstrapper): project layout detection, port probing and reclamation,
//! archive extraction, dependency installation, privileged-port patching,
//! and application launching.
//!
//! # Example
//!
//! ```no_run
//! use ldb_core::{detect_project_root, DeployPorts, Launcher, Workspace};
//! use std::path::PathBuf;
//!
//! let workspace = Workspace::new(PathBuf::from("."));
//! workspace.ensure_directories().unwrap();
//!
//! // Locate the project root of an extracted archive
//! let root = detect_project_root(&workspace.extract_dir(), "backend").unwrap();
//!
//! // Launch the application with the resolved ports exported
//! let ports = DeployPorts::resolve(DeployPorts::default());
//! let launcher = Launcher::new("npm start".to_string());
//! let record = launcher
//!     .launch(&root, &ports.env(), &workspace.app_log_path())
//!     .unwrap();
//! workspace.write_record(&record).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod install;
pub mod launcher;
pub mod layout;
pub mod models;
pub mod patch;
pub mod probe;
pub mod provision;
pub mod reclaim;
pub mod validation;
pub mod workspace;

// Re-export commonly used types
pub use config::{ConfigManager, Settings};
pub use error::{ConfigError, LdbError, Result, ValidationError};
pub use extract::extract_archive;
pub use install::{InstallMode, Installer, LOCKFILE};
pub use launcher::Launcher;
pub use layout::detect_project_root;
pub use models::{DeployPorts, LaunchRecord, PortPurpose, PortSpec};
pub use patch::{patch_privileged_ports, PatchOutcome};
pub use probe::{detect_prober, FuserProber, LsofProber, PortProber};
pub use provision::{provision_env_file, provision_tls, ProvisionOutcome};
pub use reclaim::{is_pid_alive, PortReclaimer, ProcessSignaller, ReclaimOutcome, ShellSignaller};
pub use validation::{sanitize_for_shell, validate_backend_dir_name, validate_not_empty};
pub use workspace::Workspace;
