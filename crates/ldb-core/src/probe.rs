//! Port probing
//!
//! Discovers which processes are listening on a TCP port by shelling out to
//! whichever inspection tool is installed. The prober variant is selected
//! once at startup and used uniformly afterwards; listener sets are
//! recomputed on every probe, never cached.

use crate::error::Result;
use std::process::Command;

/// Trait for probers that discover listeners on a TCP port
pub trait PortProber: Send + Sync {
    /// Pids of processes currently listening on `port`
    fn listeners(&self, port: u16) -> Result<Vec<u32>>;

    /// Name of the backing tool
    fn name(&self) -> &'static str;
}

/// lsof-based prober
#[derive(Debug, Default)]
pub struct LsofProber;

impl LsofProber {
    pub fn new() -> Self {
        Self
    }

    /// Check if lsof is available
    pub fn is_available() -> bool {
        Command::new("lsof")
            .arg("-v")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl PortProber for LsofProber {
    fn listeners(&self, port: u16) -> Result<Vec<u32>> {
        // lsof exits non-zero when nothing matches; that is an empty set,
        // not an error.
        let output = Command::new("lsof")
            .args(["-t", "-i", &format!("tcp:{}", port), "-sTCP:LISTEN"])
            .output()?;

        Ok(parse_pid_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &'static str {
        "lsof"
    }
}

/// fuser-based prober (fallback)
#[derive(Debug, Default)]
pub struct FuserProber;

impl FuserProber {
    pub fn new() -> Self {
        Self
    }

    /// Check if fuser is available
    pub fn is_available() -> bool {
        Command::new("fuser")
            .arg("-V")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl PortProber for FuserProber {
    fn listeners(&self, port: u16) -> Result<Vec<u32>> {
        // fuser prints the "<port>/tcp:" label to stderr and the pids to
        // stdout; a non-zero exit means no process was found.
        let output = Command::new("fuser")
            .arg(format!("{}/tcp", port))
            .output()?;

        Ok(parse_pid_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &'static str {
        "fuser"
    }
}

/// Select a prober for the available inspection tool, preferring lsof.
///
/// Returns `None` when neither tool is installed; callers degrade to a
/// warning no-op in that case.
pub fn detect_prober() -> Option<Box<dyn PortProber>> {
    if LsofProber::is_available() {
        tracing::debug!("using lsof for port probing");
        return Some(Box::new(LsofProber::new()));
    }
    if FuserProber::is_available() {
        tracing::debug!("using fuser for port probing");
        return Some(Box::new(FuserProber::new()));
    }
    None
}

/// Parse whitespace/newline-separated pids, deduplicated and sorted.
fn parse_pid_list(raw: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = raw
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}
