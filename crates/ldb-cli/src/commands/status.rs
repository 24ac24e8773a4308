//! Status command implementation

use anyhow::Result;
use comfy_table::Cell;
use ldb_core::{detect_prober, is_pid_alive, ConfigManager, DeployPorts, LdbError, Workspace};
use serde::Serialize;

use crate::output::{OutputContext, TableBuilder};
use crate::ExitCode;

#[derive(Serialize)]
struct PortStatus {
    purpose: String,
    port: u16,
    listeners: Option<Vec<u32>>,
}

pub fn run(config: &ConfigManager, workspace: &Workspace, ctx: &OutputContext) -> Result<ExitCode> {
    let settings = config.load()?;
    let ports = DeployPorts::resolve(settings.ports());

    let record = match workspace.read_record() {
        Ok(record) => Some(record),
        Err(LdbError::RecordNotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let running = record.as_ref().map(|r| is_pid_alive(r.pid)).unwrap_or(false);

    let prober = detect_prober();
    let port_statuses: Vec<PortStatus> = ports
        .specs()
        .iter()
        .map(|spec| PortStatus {
            purpose: spec.purpose.to_string(),
            port: spec.port,
            listeners: prober
                .as_ref()
                .map(|p| p.listeners(spec.port).unwrap_or_default()),
        })
        .collect();

    if ctx.json {
        ctx.json(&serde_json::json!({
            "record": record,
            "running": running,
            "ports": port_statuses,
        }))?;
        return Ok(ExitCode::Success);
    }

    match &record {
        Some(record) => {
            println!("Deployment: {}", record.id);
            println!("Command:    {}", record.command);
            println!("PID:        {}", record.pid);
            println!("Status:     {}", ctx.status_indicator(running));
            println!("Log:        {}", record.log_path.display());
            println!("Started:    {}", record.started_at.to_rfc3339());
        }
        None => {
            ctx.info("No launch record found; nothing has been deployed here");
        }
    }

    println!();
    let mut table = TableBuilder::new(vec!["Purpose", "Port", "State"]);
    for status in &port_statuses {
        let state_cell = match &status.listeners {
            Some(listeners) => ctx.listener_cell(listeners.len()),
            None => Cell::new("unknown"),
        };
        table.add_row(vec![
            Cell::new(&status.purpose),
            Cell::new(status.port),
            state_cell,
        ]);
    }
    println!("{}", table.build());

    if prober.is_none() {
        ctx.warn("No port inspection tool found (lsof or fuser); port states unknown");
    }

    Ok(ExitCode::Success)
}
