//! Command implementations for the CLI

pub mod completions;
pub mod config_cmd;
pub mod detect;
pub mod doctor;
pub mod free_port;
pub mod halt;
pub mod logs;
pub mod patch_ports;
pub mod status;
pub mod up;
