//! Halt command implementation
//!
//! Terminates the recorded application process using the same
//! graceful-then-forced escalation as port reclamation, then consumes the
//! launch record.

use anyhow::Result;
use ldb_core::{is_pid_alive, ConfigManager, ProcessSignaller, ShellSignaller, Workspace};
use std::time::Duration;

use crate::output::OutputContext;
use crate::ExitCode;

pub fn run(config: &ConfigManager, workspace: &Workspace, ctx: &OutputContext) -> Result<ExitCode> {
    let settings = config.load()?;
    let record = workspace.read_record()?;

    if !is_pid_alive(record.pid) {
        workspace.clear_record()?;

        if ctx.json {
            ctx.json(&serde_json::json!({
                "status": "not_running",
                "pid": record.pid
            }))?;
        } else {
            ctx.info(&format!(
                "Process {} is not running; cleared launch record",
                record.pid
            ));
        }
        return Ok(ExitCode::Success);
    }

    let signaller = ShellSignaller::new();
    let pids = [record.pid];

    signaller.terminate(&pids)?;
    std::thread::sleep(Duration::from_millis(settings.grace_period_ms));

    let forced = if is_pid_alive(record.pid) {
        signaller.kill(&pids)?;
        true
    } else {
        false
    };

    workspace.clear_record()?;

    if ctx.json {
        ctx.json(&serde_json::json!({
            "status": "halted",
            "pid": record.pid,
            "forced": forced
        }))?;
    } else if forced {
        ctx.success(&format!("Halted pid {} (forced)", record.pid));
    } else {
        ctx.success(&format!("Halted pid {}", record.pid));
    }

    Ok(ExitCode::Success)
}
