//! Application launcher
//!
//! Starts the application's declared start procedure as a detached
//! background process with combined output redirected to a log file. The
//! launcher does not supervise or restart the process; the returned record
//! is the only handle an operator gets.
//!
//! # Security Note
//!
//! The start command is executed as-is via a shell (`sh -c`), matching how
//! deployment scripts declare start procedures. Operators should only
//! deploy archives they trust, as the command runs with the same privileges
//! as the LDB process itself.

use crate::error::{LdbError, Result};
use crate::models::LaunchRecord;
use crate::validation::sanitize_for_shell;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Launches the application start command
#[derive(Debug, Clone)]
pub struct Launcher {
    start_command: String,
}

impl Launcher {
    pub fn new(start_command: String) -> Self {
        Self { start_command }
    }

    /// Compose the shell command line, appending output redirection.
    fn shell_command(&self, log_path: &Path) -> Result<String> {
        let log_path_str = log_path.to_str().ok_or(LdbError::InvalidPath)?;
        let escaped_log_path = sanitize_for_shell(log_path_str)?;
        Ok(format!("{} >> {} 2>&1", self.start_command, escaped_log_path))
    }

    /// Start the application from `project_root` with `env` exported,
    /// detached into its own process group.
    ///
    /// Spawn failure is fatal to the overall run. Once spawned, the child is
    /// not awaited; it outlives this process.
    pub fn launch(
        &self,
        project_root: &Path,
        env: &[(String, String)],
        log_path: &Path,
    ) -> Result<LaunchRecord> {
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let shell_cmd = self.shell_command(log_path)?;

        let mut cmd = Command::new("sh");
        cmd.args(["-c", &shell_cmd])
            .current_dir(project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        for (key, value) in env {
            cmd.env(key, value);
        }

        // Detach into a fresh process group so the child survives this
        // process and signals aimed at our group.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .map_err(|e| LdbError::LaunchFailed(e.to_string()))?;

        let pid = child.id();
        tracing::info!(pid, command = %self.start_command, "application launched");

        Ok(LaunchRecord::new(
            pid,
            log_path.to_path_buf(),
            self.start_command.clone(),
        ))
    }
}
