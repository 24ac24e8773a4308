//! Patch-ports command implementation

use anyhow::Result;
use ldb_core::{patch_privileged_ports, ConfigManager, DeployPorts, PatchOutcome};
use std::path::Path;

use crate::output::OutputContext;
use crate::ExitCode;

pub fn run(config: &ConfigManager, file: &Path, ctx: &OutputContext) -> Result<ExitCode> {
    let settings = config.load()?;
    let ports = DeployPorts::resolve(settings.ports());

    let outcome = patch_privileged_ports(file, ports.http, ports.https)?;

    if ctx.json {
        let (status, replacements) = match outcome {
            PatchOutcome::Patched { replacements } => ("patched", replacements),
            PatchOutcome::Unchanged => ("unchanged", 0),
        };
        ctx.json(&serde_json::json!({
            "status": status,
            "file": file.to_string_lossy(),
            "replacements": replacements,
        }))?;
    } else {
        match outcome {
            PatchOutcome::Patched { replacements } => {
                ctx.success(&format!(
                    "Patched {} privileged-port binding(s) in {}",
                    replacements,
                    file.display()
                ));
            }
            PatchOutcome::Unchanged => {
                ctx.info(&format!("No privileged-port bindings in {}", file.display()));
            }
        }
    }

    Ok(ExitCode::Success)
}
