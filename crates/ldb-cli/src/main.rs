//! LDB CLI - Local Deployment Bootstrapper Command Line Interface

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use ldb_core::{ConfigManager, LdbError, Workspace};
use std::path::PathBuf;

mod commands;
mod output;

use commands::*;

/// Exit codes for the CLI
#[derive(Debug, Clone, Copy)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    ArchiveNotFound = 10,
    LayoutNotFound = 11,
    BackendMissing = 12,
    ToolMissing = 20,
    LaunchFailed = 21,
    RecordNotFound = 22,
    ConfigError = 30,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Map fatal core errors onto their dedicated exit codes.
fn exit_code_for(err: &LdbError) -> ExitCode {
    match err {
        LdbError::ArchiveNotFound(_) => ExitCode::ArchiveNotFound,
        LdbError::LayoutNotFound(_) => ExitCode::LayoutNotFound,
        LdbError::BackendMissing(_) => ExitCode::BackendMissing,
        LdbError::ToolMissing(_) => ExitCode::ToolMissing,
        LdbError::LaunchFailed(_) => ExitCode::LaunchFailed,
        LdbError::RecordNotFound(_) => ExitCode::RecordNotFound,
        LdbError::Config(_) => ExitCode::ConfigError,
        _ => ExitCode::GeneralError,
    }
}

/// LDB (Local Deployment Bootstrapper) - Extract, patch, and launch packaged apps
#[derive(Parser)]
#[command(name = "ldb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Deployment workspace directory
    #[arg(short, long, global = true, env = "LDB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full bootstrap sequence: extract, install, patch, and launch
    Up {
        /// Archive to deploy (overrides the configured candidates)
        #[arg(short, long)]
        archive: Option<PathBuf>,

        /// Skip dependency installation
        #[arg(long)]
        skip_install: bool,

        /// Skip privileged-port patching
        #[arg(long)]
        no_patch: bool,
    },

    /// Detect the project root of an extracted archive
    Detect {
        /// Directory to inspect (defaults to the workspace extract dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Free a listening port, escalating from graceful to forced termination
    FreePort {
        /// Port number to reclaim
        port: u16,
    },

    /// Rewrite privileged-port bindings in a source file
    PatchPorts {
        /// Source file to patch
        file: PathBuf,
    },

    /// Show the launch record and current port listeners
    Status,

    /// View the captured application log
    Logs {
        /// Follow log output
        #[arg(short, long)]
        follow: bool,

        /// Number of lines to show
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },

    /// Terminate the recorded application process
    Halt,

    /// Check system requirements
    Doctor,

    /// Show or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Set up output formatting
    let ctx = output::OutputContext::new(cli.json, cli.no_color, cli.quiet);

    let workspace = Workspace::new(cli.workspace.clone());

    let result = run_command(cli.command, &workspace, &ctx);

    match result {
        Ok(code) => std::process::exit(code.into()),
        Err(e) => {
            ctx.error(&format!("{:#}", e));
            let code = e
                .downcast_ref::<LdbError>()
                .map(exit_code_for)
                .unwrap_or(ExitCode::GeneralError);
            std::process::exit(code.into());
        }
    }
}

fn run_command(
    command: Commands,
    workspace: &Workspace,
    ctx: &output::OutputContext,
) -> Result<ExitCode> {
    let config = ConfigManager::with_defaults()?;

    match command {
        Commands::Up {
            archive,
            skip_install,
            no_patch,
        } => up::run(&config, workspace, archive, skip_install, no_patch, ctx),

        Commands::Detect { dir } => detect::run(&config, workspace, dir, ctx),

        Commands::FreePort { port } => free_port::run(&config, port, ctx),

        Commands::PatchPorts { file } => patch_ports::run(&config, &file, ctx),

        Commands::Status => status::run(&config, workspace, ctx),

        Commands::Logs { follow, lines } => logs::run(workspace, follow, lines, ctx),

        Commands::Halt => halt::run(&config, workspace, ctx),

        Commands::Doctor => doctor::run(&config, workspace, ctx),

        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&config, ctx),
            ConfigAction::Set { key, value } => config_cmd::set(&config, &key, &value, ctx),
        },

        Commands::Completions { shell } => {
            completions::run(shell);
            Ok(ExitCode::Success)
        }
    }
}
