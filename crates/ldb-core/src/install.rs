//! Dependency installation
//!
//! Installs declared dependencies for a project directory by shelling out to
//! npm. A lockfile selects the reproducible install path; a reproducible
//! install that fails falls back to a loose install.

use crate::error::{LdbError, Result};
use std::path::Path;
use std::process::Command;

/// Lockfile that selects the reproducible install path
pub const LOCKFILE: &str = "package-lock.json";

/// Which install path succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// `npm ci` — fails rather than resolving version drift
    Reproducible,
    /// `npm install` — resolves versions as needed
    Loose,
}

impl std::fmt::Display for InstallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallMode::Reproducible => write!(f, "reproducible"),
            InstallMode::Loose => write!(f, "loose"),
        }
    }
}

/// Trait for running an installer command in a directory
pub trait CommandRunner: Send + Sync {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;
}

/// Runner that executes the real command
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program).args(args).current_dir(dir).status()?;

        if !status.success() {
            return Err(LdbError::ProcessFailed(format!(
                "{} {} exited with status: {}",
                program,
                args.join(" "),
                status
            )));
        }

        Ok(())
    }
}

/// Installs dependencies for detected project directories
pub struct Installer {
    runner: Box<dyn CommandRunner>,
}

impl Default for Installer {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer {
    pub fn new() -> Self {
        Self {
            runner: Box::new(ShellRunner),
        }
    }

    /// Constructor with an injected runner, for testing.
    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Check if npm is available
    pub fn is_available() -> bool {
        Command::new("npm")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get the npm version string
    pub fn version() -> Option<String> {
        Command::new("npm")
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    }

    /// Install dependencies in `dir`.
    ///
    /// With a lockfile present, attempts a reproducible install first and
    /// falls back to a loose install on failure. Without one, installs
    /// loosely right away.
    pub fn install(&self, dir: &Path) -> Result<InstallMode> {
        if dir.join(LOCKFILE).exists() {
            match self.runner.run(dir, "npm", &["ci"]) {
                Ok(()) => return Ok(InstallMode::Reproducible),
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "reproducible install failed, falling back to loose install"
                    );
                }
            }
        }

        self.runner.run(dir, "npm", &["install"])?;
        Ok(InstallMode::Loose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Runner recording invocations and failing on scripted arg sets
    struct ScriptedRunner {
        calls: Mutex<Vec<Vec<String>>>,
        fail_on: Vec<&'static str>,
    }

    impl ScriptedRunner {
        fn new(fail_on: Vec<&'static str>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _dir: &Path, _program: &str, args: &[&str]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(args.iter().map(|s| s.to_string()).collect());

            if self.fail_on.iter().any(|f| *f == args[0]) {
                return Err(LdbError::ProcessFailed(format!("npm {} failed", args[0])));
            }
            Ok(())
        }
    }

    fn installer_with(
        fail_on: Vec<&'static str>,
    ) -> (Installer, std::sync::Arc<ScriptedRunner>) {
        let runner = std::sync::Arc::new(ScriptedRunner::new(fail_on));

        struct SharedRunner(std::sync::Arc<ScriptedRunner>);
        impl CommandRunner for SharedRunner {
            fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
                self.0.run(dir, program, args)
            }
        }

        let installer = Installer::with_runner(Box::new(SharedRunner(runner.clone())));
        (installer, runner)
    }

    #[test]
    fn test_lockfile_selects_reproducible_install() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCKFILE), "{}").unwrap();

        let (installer, runner) = installer_with(vec![]);
        let mode = installer.install(temp.path()).unwrap();

        assert_eq!(mode, InstallMode::Reproducible);
        assert_eq!(*runner.calls.lock().unwrap(), vec![vec!["ci".to_string()]]);
    }

    #[test]
    fn test_no_lockfile_installs_loose() {
        let temp = TempDir::new().unwrap();

        let (installer, runner) = installer_with(vec![]);
        let mode = installer.install(temp.path()).unwrap();

        assert_eq!(mode, InstallMode::Loose);
        assert_eq!(
            *runner.calls.lock().unwrap(),
            vec![vec!["install".to_string()]]
        );
    }

    #[test]
    fn test_reproducible_failure_falls_back_to_loose() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCKFILE), "{}").unwrap();

        let (installer, runner) = installer_with(vec!["ci"]);
        let mode = installer.install(temp.path()).unwrap();

        assert_eq!(mode, InstallMode::Loose);
        assert_eq!(
            *runner.calls.lock().unwrap(),
            vec![vec!["ci".to_string()], vec!["install".to_string()]]
        );
    }

    #[test]
    fn test_both_paths_failing_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LOCKFILE), "{}").unwrap();

        let (installer, _runner) = installer_with(vec!["ci", "install"]);
        let result = installer.install(temp.path());

        assert!(matches!(result, Err(LdbError::ProcessFailed(_))));
    }

    #[test]
    fn test_install_mode_display() {
        assert_eq!(InstallMode::Reproducible.to_string(), "reproducible");
        assert_eq!(InstallMode::Loose.to_string(), "loose");
    }
}
