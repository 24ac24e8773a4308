//! Detect command implementation

use anyhow::Result;
use ldb_core::{detect_project_root, ConfigManager, Workspace};
use std::path::PathBuf;

use crate::output::OutputContext;
use crate::ExitCode;

pub fn run(
    config: &ConfigManager,
    workspace: &Workspace,
    dir: Option<PathBuf>,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let settings = config.load()?;
    let root = dir.unwrap_or_else(|| workspace.extract_dir());

    let project_root = detect_project_root(&root, &settings.backend_dir)?;

    if ctx.json {
        ctx.json(&serde_json::json!({
            "project_root": project_root.to_string_lossy(),
            "backend_dir": settings.backend_dir,
        }))?;
    } else {
        println!("{}", project_root.display());
    }

    Ok(ExitCode::Success)
}
