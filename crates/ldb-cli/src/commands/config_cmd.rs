//! Config command implementation

use anyhow::Result;
use ldb_core::{validate_backend_dir_name, validate_not_empty, ConfigManager};

use crate::output::OutputContext;
use crate::ExitCode;

pub fn show(config: &ConfigManager, ctx: &OutputContext) -> Result<ExitCode> {
    let settings = config.load()?;

    if ctx.json {
        ctx.json(&settings)?;
    } else {
        println!("Configuration:");
        println!("  Config file: {}", config.config_path().display());
        println!();
        println!("Settings:");
        println!("  backend_dir: {}", settings.backend_dir);
        println!("  start_command: {}", settings.start_command);
        println!("  grace_period_ms: {}", settings.grace_period_ms);
        println!("  backend_port: {}", settings.backend_port);
        println!("  http_port: {}", settings.http_port);
        println!("  https_port: {}", settings.https_port);
        println!("  archive_candidates:");
        for candidate in &settings.archive_candidates {
            println!("    - {}", candidate.display());
        }
    }

    Ok(ExitCode::Success)
}

pub fn set(config: &ConfigManager, key: &str, value: &str, ctx: &OutputContext) -> Result<ExitCode> {
    let mut settings = config.load()?;

    match key {
        "backend_dir" => {
            validate_backend_dir_name(value)?;
            settings.backend_dir = value.to_string();
        }
        "start_command" => {
            validate_not_empty(value)?;
            settings.start_command = value.to_string();
        }
        "grace_period_ms" => {
            let grace: u64 = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid grace period: must be a positive integer"))?;
            if grace == 0 {
                return Err(anyhow::anyhow!("Grace period must be greater than 0"));
            }
            settings.grace_period_ms = grace;
        }
        "backend_port" => {
            settings.backend_port = parse_port(value)?;
        }
        "http_port" => {
            settings.http_port = parse_port(value)?;
        }
        "https_port" => {
            settings.https_port = parse_port(value)?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown config key: {}. Valid keys: backend_dir, start_command, grace_period_ms, backend_port, http_port, https_port",
                key
            ));
        }
    }

    config.save(&settings)?;

    if ctx.json {
        ctx.json(&serde_json::json!({
            "status": "updated",
            "key": key,
            "value": value
        }))?;
    } else {
        ctx.success(&format!("Set {} = {}", key, value));
    }

    Ok(ExitCode::Success)
}

fn parse_port(value: &str) -> Result<u16> {
    let port: u16 = value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid port: must be 1-65535"))?;
    if port == 0 {
        return Err(anyhow::anyhow!("Invalid port: must be 1-65535"));
    }
    Ok(port)
}
