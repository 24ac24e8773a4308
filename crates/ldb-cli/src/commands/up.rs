//! Up command implementation
//!
//! The full bootstrap sequence, strictly in order: resolve and extract the
//! archive, detect the project layout, provision, install, patch, reclaim
//! ports, and launch. Precondition failures are fatal; everything else
//! degrades to a warning.

use anyhow::Result;
use ldb_core::{
    detect_project_root, detect_prober, extract_archive, is_pid_alive, patch_privileged_ports,
    provision_env_file, provision_tls, ConfigManager, DeployPorts, Installer, Launcher, LdbError,
    PatchOutcome, PortReclaimer, ProvisionOutcome, ReclaimOutcome, Settings, Workspace,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::OutputContext;
use crate::ExitCode;

/// Backend entry files probed for privileged-port bindings
const ENTRY_FILE_CANDIDATES: &[&str] = &["server.js", "index.js", "app.js"];

pub fn run(
    config: &ConfigManager,
    workspace: &Workspace,
    archive_override: Option<PathBuf>,
    skip_install: bool,
    no_patch: bool,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let settings = config.load()?;

    // Required-tool precondition
    if !skip_install && !Installer::is_available() {
        return Err(LdbError::ToolMissing("npm".to_string()).into());
    }

    workspace.ensure_directories()?;

    if let Ok(record) = workspace.read_record() {
        if is_pid_alive(record.pid) {
            ctx.warn(&format!(
                "A previous deployment appears to be running (pid {}); use 'ldb halt' to stop it",
                record.pid
            ));
        }
    }

    // Resolve and extract the archive
    let archive = match archive_override {
        Some(path) if path.is_file() => path,
        Some(path) => {
            return Err(LdbError::ArchiveNotFound(path.display().to_string()).into());
        }
        None => workspace.resolve_archive(&settings.archive_candidates)?,
    };

    ctx.info(&format!("Extracting {}", archive.display()));
    extract_archive(&archive, &workspace.extract_dir())?;

    // Layout detection
    let project_root = detect_project_root(&workspace.extract_dir(), &settings.backend_dir)?;
    ctx.info(&format!("Project root: {}", project_root.display()));

    let backend_path = project_root.join(&settings.backend_dir);
    if !backend_path.is_dir() {
        return Err(LdbError::BackendMissing(backend_path).into());
    }

    // Environment file
    if let Err(e) = provision_env_file(&project_root) {
        ctx.warn(&format!("Could not provision environment file: {}", e));
    }

    // Dependencies
    if skip_install {
        ctx.info("Skipping dependency installation");
    } else {
        install_dependencies(&backend_path, &project_root, ctx);
    }

    let ports = DeployPorts::resolve(settings.ports());
    tracing::debug!(
        backend = ports.backend,
        http = ports.http,
        https = ports.https,
        "resolved deployment ports"
    );

    // Privileged-port patching
    if !no_patch {
        patch_entry_file(&backend_path, ports, ctx);
    }

    // TLS material
    match provision_tls(&workspace.tls_dir(), &project_root) {
        Ok(ProvisionOutcome::Provisioned) => ctx.info("TLS material provisioned"),
        Ok(ProvisionOutcome::Skipped) => {}
        Err(e) => ctx.warn(&format!("Could not provision TLS material: {}", e)),
    }

    // Free the ports we are about to bind
    reclaim_ports(&settings, ports, ctx);

    // Launch
    let launcher = Launcher::new(settings.start_command.clone());
    let record = launcher.launch(&project_root, &ports.env(), &workspace.app_log_path())?;
    workspace.write_record(&record)?;

    if ctx.json {
        ctx.json(&serde_json::json!({
            "status": "launched",
            "pid": record.pid,
            "project_root": project_root.to_string_lossy(),
            "log_path": record.log_path.to_string_lossy(),
            "ports": ports,
        }))?;
    } else {
        ctx.success(&format!("Application launched (pid {})", record.pid));
        ctx.info(&format!("Logs: {}", record.log_path.display()));
        ctx.info(&format!("Record: {}", workspace.record_path().display()));
    }

    Ok(ExitCode::Success)
}

fn install_dependencies(backend_path: &Path, project_root: &Path, ctx: &OutputContext) {
    let installer = Installer::new();

    match installer.install(backend_path) {
        Ok(mode) => ctx.success(&format!("Backend dependencies installed ({})", mode)),
        Err(e) => ctx.warn(&format!("Backend dependency installation failed: {}", e)),
    }

    // Frontend is optional; only install when one ships with the archive
    let frontend = project_root.join("frontend");
    if frontend.join("package.json").is_file() {
        match installer.install(&frontend) {
            Ok(mode) => ctx.success(&format!("Frontend dependencies installed ({})", mode)),
            Err(e) => ctx.warn(&format!("Frontend dependency installation failed: {}", e)),
        }
    }
}

fn patch_entry_file(backend_path: &Path, ports: DeployPorts, ctx: &OutputContext) {
    let Some(entry) = ENTRY_FILE_CANDIDATES
        .iter()
        .map(|name| backend_path.join(name))
        .find(|path| path.is_file())
    else {
        ctx.warn("No backend entry file found to patch");
        return;
    };

    match patch_privileged_ports(&entry, ports.http, ports.https) {
        Ok(PatchOutcome::Patched { replacements }) => {
            ctx.success(&format!(
                "Patched {} privileged-port binding(s) in {}",
                replacements,
                entry.display()
            ));
        }
        Ok(PatchOutcome::Unchanged) => {
            ctx.info(&format!(
                "No privileged-port bindings in {}",
                entry.display()
            ));
        }
        Err(e) => ctx.warn(&format!("Could not patch {}: {}", entry.display(), e)),
    }
}

fn reclaim_ports(settings: &Settings, ports: DeployPorts, ctx: &OutputContext) {
    let Some(prober) = detect_prober() else {
        ctx.warn("No port inspection tool found (lsof or fuser); skipping port reclamation");
        return;
    };

    let reclaimer = PortReclaimer::new(prober, Duration::from_millis(settings.grace_period_ms));

    for spec in ports.specs() {
        match reclaimer.reclaim(spec.port) {
            Ok(ReclaimOutcome::AlreadyFree) => {
                ctx.info(&format!("Port {} ({}) is free", spec.port, spec.purpose));
            }
            Ok(ReclaimOutcome::Reclaimed { terminated, killed }) => {
                ctx.info(&format!(
                    "Freed port {} ({}): {} terminated, {} killed",
                    spec.port, spec.purpose, terminated, killed
                ));
            }
            Err(e) => {
                ctx.warn(&format!(
                    "Could not reclaim port {} ({}): {}",
                    spec.port, spec.purpose, e
                ));
            }
        }
    }
}
