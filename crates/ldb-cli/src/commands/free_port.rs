//! Free-port command implementation

use anyhow::Result;
use ldb_core::{detect_prober, ConfigManager, PortReclaimer, ReclaimOutcome};
use std::time::Duration;

use crate::output::OutputContext;
use crate::ExitCode;

pub fn run(config: &ConfigManager, port: u16, ctx: &OutputContext) -> Result<ExitCode> {
    let settings = config.load()?;

    let Some(prober) = detect_prober() else {
        if ctx.json {
            ctx.json(&serde_json::json!({
                "status": "skipped",
                "port": port,
                "reason": "no port inspection tool found"
            }))?;
        } else {
            ctx.warn("No port inspection tool found (lsof or fuser); nothing to do");
        }
        return Ok(ExitCode::Success);
    };

    let reclaimer = PortReclaimer::new(prober, Duration::from_millis(settings.grace_period_ms));
    let outcome = reclaimer.reclaim(port)?;

    if ctx.json {
        ctx.json(&serde_json::json!({
            "port": port,
            "result": outcome,
        }))?;
    } else {
        match outcome {
            ReclaimOutcome::AlreadyFree => {
                ctx.success(&format!("Port {} is free", port));
            }
            ReclaimOutcome::Reclaimed { terminated, killed } => {
                ctx.success(&format!(
                    "Freed port {}: {} terminated, {} killed",
                    port, terminated, killed
                ));
            }
        }
    }

    Ok(ExitCode::Success)
}
