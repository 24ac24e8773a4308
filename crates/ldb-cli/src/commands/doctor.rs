//! Doctor command implementation

use anyhow::Result;
use ldb_core::{ConfigManager, FuserProber, Installer, LsofProber, Workspace};
use serde::Serialize;
use std::process::Command;

use crate::output::OutputContext;
use crate::ExitCode;

#[derive(Serialize)]
struct Check {
    name: String,
    status: String,
    message: String,
    required: bool,
}

pub fn run(config: &ConfigManager, workspace: &Workspace, ctx: &OutputContext) -> Result<ExitCode> {
    let mut checks = Vec::new();
    let mut all_required_passed = true;

    let shell_check = check_shell();
    if shell_check.status == "fail" && shell_check.required {
        all_required_passed = false;
    }
    checks.push(shell_check);

    let npm_check = check_npm();
    if npm_check.status == "fail" && npm_check.required {
        all_required_passed = false;
    }
    checks.push(npm_check);

    // Port inspection tools are optional; reclamation degrades to a no-op
    checks.push(check_lsof());
    checks.push(check_fuser());

    let config_check = check_config_dir(config);
    if config_check.status == "fail" && config_check.required {
        all_required_passed = false;
    }
    checks.push(config_check);

    let log_check = check_log_dir(workspace);
    if log_check.status == "fail" && log_check.required {
        all_required_passed = false;
    }
    checks.push(log_check);

    if ctx.json {
        ctx.json(&serde_json::json!({
            "checks": checks,
            "all_passed": all_required_passed
        }))?;
    } else {
        println!("System Diagnostics");
        println!("==================");
        println!();

        for check in &checks {
            let indicator = if check.status == "pass" {
                if ctx.no_color {
                    "✓"
                } else {
                    "\x1b[32m✓\x1b[0m"
                }
            } else if check.required {
                if ctx.no_color {
                    "✗"
                } else {
                    "\x1b[31m✗\x1b[0m"
                }
            } else {
                if ctx.no_color {
                    "-"
                } else {
                    "\x1b[33m-\x1b[0m"
                }
            };

            let required_label = if check.required { "" } else { " (optional)" };
            println!("{} {}{}: {}", indicator, check.name, required_label, check.message);
        }

        println!();
        if all_required_passed {
            ctx.success("All required checks passed");
        } else {
            ctx.error("Some required checks failed");
        }
    }

    if all_required_passed {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::GeneralError)
    }
}

fn check_shell() -> Check {
    let output = Command::new("sh").arg("-c").arg("echo ok").output();

    match output {
        Ok(o) if o.status.success() => Check {
            name: "shell".to_string(),
            status: "pass".to_string(),
            message: "/bin/sh available".to_string(),
            required: true,
        },
        _ => Check {
            name: "shell".to_string(),
            status: "fail".to_string(),
            message: "sh not available".to_string(),
            required: true,
        },
    }
}

fn check_npm() -> Check {
    if Installer::is_available() {
        let version = Installer::version().unwrap_or_else(|| "unknown".to_string());
        Check {
            name: "npm".to_string(),
            status: "pass".to_string(),
            message: version,
            required: true,
        }
    } else {
        Check {
            name: "npm".to_string(),
            status: "fail".to_string(),
            message: "not found in PATH".to_string(),
            required: true,
        }
    }
}

fn check_lsof() -> Check {
    if LsofProber::is_available() {
        Check {
            name: "lsof".to_string(),
            status: "pass".to_string(),
            message: "available".to_string(),
            required: false,
        }
    } else {
        Check {
            name: "lsof".to_string(),
            status: "fail".to_string(),
            message: "not found".to_string(),
            required: false,
        }
    }
}

fn check_fuser() -> Check {
    if FuserProber::is_available() {
        Check {
            name: "fuser".to_string(),
            status: "pass".to_string(),
            message: "available".to_string(),
            required: false,
        }
    } else {
        Check {
            name: "fuser".to_string(),
            status: "fail".to_string(),
            message: "not found".to_string(),
            required: false,
        }
    }
}

fn check_config_dir(config: &ConfigManager) -> Check {
    if config.is_config_dir_writable() {
        Check {
            name: "config_dir".to_string(),
            status: "pass".to_string(),
            message: format!("{} (writable)", config.config_dir().display()),
            required: true,
        }
    } else {
        Check {
            name: "config_dir".to_string(),
            status: "fail".to_string(),
            message: format!("{} (not writable)", config.config_dir().display()),
            required: true,
        }
    }
}

fn check_log_dir(workspace: &Workspace) -> Check {
    if workspace.is_log_dir_writable() {
        Check {
            name: "log_dir".to_string(),
            status: "pass".to_string(),
            message: format!("{} (writable)", workspace.log_dir().display()),
            required: true,
        }
    } else {
        Check {
            name: "log_dir".to_string(),
            status: "fail".to_string(),
            message: format!("{} (not writable)", workspace.log_dir().display()),
            required: true,
        }
    }
}
