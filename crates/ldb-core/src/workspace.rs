//! Workspace paths and launch record persistence
//!
//! A workspace is the directory the archive is resolved against and extracted
//! into. The logs directory, the application log, and the launch record marker
//! file all live at fixed locations beneath it.

use crate::error::{LdbError, Result};
use crate::models::LaunchRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory the archive is extracted into, relative to the workspace
const EXTRACT_DIR_NAME: &str = "app";
/// Logs directory name, relative to the workspace
const LOG_DIR_NAME: &str = "logs";
/// Combined application output
const APP_LOG_FILE_NAME: &str = "app.log";
/// Marker file holding the launch record
const RECORD_FILE_NAME: &str = "launch.json";
/// Directory holding TLS material to provision, relative to the workspace
const TLS_DIR_NAME: &str = "tls";

/// Fixed paths under one deployment workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the archive gets extracted
    pub fn extract_dir(&self) -> PathBuf {
        self.root.join(EXTRACT_DIR_NAME)
    }

    /// Directory for the application log and the launch record
    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR_NAME)
    }

    /// The application's combined-output log file
    pub fn app_log_path(&self) -> PathBuf {
        self.log_dir().join(APP_LOG_FILE_NAME)
    }

    /// The launch record marker file
    pub fn record_path(&self) -> PathBuf {
        self.log_dir().join(RECORD_FILE_NAME)
    }

    /// Where TLS material is picked up from
    pub fn tls_dir(&self) -> PathBuf {
        self.root.join(TLS_DIR_NAME)
    }

    /// Ensure the workspace and logs directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// Resolve the application archive: first existing candidate wins.
    ///
    /// Relative candidates are resolved against the workspace root; absolute
    /// candidates are used as-is.
    pub fn resolve_archive(&self, candidates: &[PathBuf]) -> Result<PathBuf> {
        for candidate in candidates {
            let path = if candidate.is_absolute() {
                candidate.clone()
            } else {
                self.root.join(candidate)
            };
            if path.is_file() {
                return Ok(path);
            }
        }

        let looked_at = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(LdbError::ArchiveNotFound(looked_at))
    }

    /// Write the launch record marker file atomically.
    pub fn write_record(&self, record: &LaunchRecord) -> Result<()> {
        self.ensure_directories()?;

        let record_path = self.record_path();
        let temp_path = record_path.with_extension("json.tmp");

        let contents = serde_json::to_string_pretty(record)
            .map_err(crate::error::ConfigError::ParseError)?;
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &record_path)?;

        Ok(())
    }

    /// Read the launch record marker file.
    pub fn read_record(&self) -> Result<LaunchRecord> {
        let record_path = self.record_path();

        if !record_path.exists() {
            return Err(LdbError::RecordNotFound(record_path));
        }

        let contents = fs::read_to_string(&record_path)?;
        let record =
            serde_json::from_str(&contents).map_err(crate::error::ConfigError::ParseError)?;

        Ok(record)
    }

    /// Remove the launch record marker file, if present.
    pub fn clear_record(&self) -> Result<()> {
        let record_path = self.record_path();
        if record_path.exists() {
            fs::remove_file(&record_path)?;
        }
        Ok(())
    }

    /// Check if the logs directory is writable
    pub fn is_log_dir_writable(&self) -> bool {
        if self.ensure_directories().is_err() {
            return false;
        }

        let test_file = self.log_dir().join(".write_test");
        if fs::write(&test_file, "test").is_ok() {
            let _ = fs::remove_file(&test_file);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_workspace() -> (Workspace, TempDir) {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::new(temp.path().to_path_buf());
        (workspace, temp)
    }

    #[test]
    fn test_fixed_paths() {
        let (workspace, _temp) = test_workspace();

        assert!(workspace.extract_dir().ends_with("app"));
        assert!(workspace.app_log_path().ends_with("logs/app.log"));
        assert!(workspace.record_path().ends_with("logs/launch.json"));
    }

    #[test]
    fn test_resolve_archive_first_match_wins() {
        let (workspace, temp) = test_workspace();

        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/app.zip"), "x").unwrap();
        fs::write(temp.path().join("app.zip"), "x").unwrap();

        let candidates = vec![PathBuf::from("app.zip"), PathBuf::from("dist/app.zip")];
        let resolved = workspace.resolve_archive(&candidates).unwrap();

        assert_eq!(resolved, temp.path().join("app.zip"));
    }

    #[test]
    fn test_resolve_archive_skips_missing() {
        let (workspace, temp) = test_workspace();

        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/app.zip"), "x").unwrap();

        let candidates = vec![PathBuf::from("app.zip"), PathBuf::from("dist/app.zip")];
        let resolved = workspace.resolve_archive(&candidates).unwrap();

        assert_eq!(resolved, temp.path().join("dist/app.zip"));
    }

    #[test]
    fn test_resolve_archive_none_found() {
        let (workspace, _temp) = test_workspace();

        let candidates = vec![PathBuf::from("app.zip")];
        let result = workspace.resolve_archive(&candidates);

        assert!(matches!(result, Err(LdbError::ArchiveNotFound(_))));
    }

    #[test]
    fn test_record_round_trip() {
        let (workspace, _temp) = test_workspace();

        let record = LaunchRecord::new(
            1234,
            workspace.app_log_path(),
            "npm start".to_string(),
        );

        workspace.write_record(&record).unwrap();
        let loaded = workspace.read_record().unwrap();

        assert_eq!(record, loaded);

        // Atomic save leaves no temp file behind
        let temp_path = workspace.record_path().with_extension("json.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_read_record_missing() {
        let (workspace, _temp) = test_workspace();

        let result = workspace.read_record();
        assert!(matches!(result, Err(LdbError::RecordNotFound(_))));
    }

    #[test]
    fn test_clear_record() {
        let (workspace, _temp) = test_workspace();

        let record = LaunchRecord::new(1, workspace.app_log_path(), "npm start".to_string());
        workspace.write_record(&record).unwrap();

        workspace.clear_record().unwrap();
        assert!(!workspace.record_path().exists());

        // Clearing twice is fine
        workspace.clear_record().unwrap();
    }

    #[test]
    fn test_is_log_dir_writable() {
        let (workspace, _temp) = test_workspace();
        assert!(workspace.is_log_dir_writable());
    }
}
