//! Port reclamation
//!
//! Frees a listening port on a best-effort basis: one batched graceful
//! termination, a grace period for cooperative shutdown, then one batched
//! forced termination for survivors. There is no re-verification after the
//! forced pass; a process that respawns inside the window may survive.

use crate::error::Result;
use crate::probe::PortProber;
use serde::Serialize;
use std::process::Command;
use std::time::Duration;

/// Trait for sending termination signals to batches of processes
pub trait ProcessSignaller: Send + Sync {
    /// Send a catchable termination signal (SIGTERM) to all pids in one batch
    fn terminate(&self, pids: &[u32]) -> Result<()>;

    /// Send an uncatchable termination signal (SIGKILL) to all pids in one batch
    fn kill(&self, pids: &[u32]) -> Result<()>;
}

/// Signaller that shells out to `kill`
#[derive(Debug, Default)]
pub struct ShellSignaller;

impl ShellSignaller {
    pub fn new() -> Self {
        Self
    }

    fn signal(&self, sig: &str, pids: &[u32]) -> Result<()> {
        if pids.is_empty() {
            return Ok(());
        }

        let mut cmd = Command::new("kill");
        cmd.arg(sig);
        for pid in pids {
            cmd.arg(pid.to_string());
        }

        // kill exits non-zero when a pid is already gone; that is not a
        // failure of the reclaim.
        let _ = cmd.status()?;
        Ok(())
    }
}

impl ProcessSignaller for ShellSignaller {
    fn terminate(&self, pids: &[u32]) -> Result<()> {
        self.signal("-TERM", pids)
    }

    fn kill(&self, pids: &[u32]) -> Result<()> {
        self.signal("-KILL", pids)
    }
}

/// Check whether a process is alive, using the null-signal probe.
pub fn is_pid_alive(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Outcome of one reclaim cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReclaimOutcome {
    /// No process was listening; zero signals sent
    AlreadyFree,
    /// Listeners were signalled
    Reclaimed {
        /// Pids that received the graceful signal
        terminated: usize,
        /// Pids still listening after the grace period that received the
        /// forced signal
        killed: usize,
    },
}

/// Frees ports by escalating from graceful to forced termination
pub struct PortReclaimer {
    prober: Box<dyn PortProber>,
    signaller: Box<dyn ProcessSignaller>,
    grace: Duration,
}

impl PortReclaimer {
    pub fn new(prober: Box<dyn PortProber>, grace: Duration) -> Self {
        Self {
            prober,
            signaller: Box::new(ShellSignaller::new()),
            grace,
        }
    }

    /// Constructor with an injected signaller, for testing.
    pub fn with_signaller(
        prober: Box<dyn PortProber>,
        signaller: Box<dyn ProcessSignaller>,
        grace: Duration,
    ) -> Self {
        Self {
            prober,
            signaller,
            grace,
        }
    }

    /// Ensure nothing is listening on `port` when this returns, best-effort.
    pub fn reclaim(&self, port: u16) -> Result<ReclaimOutcome> {
        let pids = self.prober.listeners(port)?;

        if pids.is_empty() {
            tracing::debug!(port, "port already free");
            return Ok(ReclaimOutcome::AlreadyFree);
        }

        tracing::info!(port, pids = ?pids, "terminating listeners");
        self.signaller.terminate(&pids)?;

        std::thread::sleep(self.grace);

        let survivors = self.prober.listeners(port)?;
        if !survivors.is_empty() {
            tracing::warn!(port, pids = ?survivors, "forcing termination of survivors");
            self.signaller.kill(&survivors)?;
        }

        Ok(ReclaimOutcome::Reclaimed {
            terminated: pids.len(),
            killed: survivors.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Prober returning scripted listener sets, one per probe
    struct ScriptedProber {
        responses: Mutex<Vec<Vec<u32>>>,
    }

    impl ScriptedProber {
        fn new(responses: Vec<Vec<u32>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl PortProber for ScriptedProber {
        fn listeners(&self, _port: u16) -> Result<Vec<u32>> {
            let mut responses = self.responses.lock().unwrap();
            Ok(if responses.is_empty() {
                Vec::new()
            } else {
                responses.remove(0)
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Signaller recording every batch it was asked to send
    #[derive(Default)]
    struct RecordingSignaller {
        terminated: Mutex<Vec<Vec<u32>>>,
        killed: Mutex<Vec<Vec<u32>>>,
    }

    impl ProcessSignaller for RecordingSignaller {
        fn terminate(&self, pids: &[u32]) -> Result<()> {
            self.terminated.lock().unwrap().push(pids.to_vec());
            Ok(())
        }

        fn kill(&self, pids: &[u32]) -> Result<()> {
            self.killed.lock().unwrap().push(pids.to_vec());
            Ok(())
        }
    }

    fn reclaimer_with(
        responses: Vec<Vec<u32>>,
    ) -> (PortReclaimer, std::sync::Arc<RecordingSignaller>) {
        let signaller = std::sync::Arc::new(RecordingSignaller::default());

        struct SharedSignaller(std::sync::Arc<RecordingSignaller>);
        impl ProcessSignaller for SharedSignaller {
            fn terminate(&self, pids: &[u32]) -> Result<()> {
                self.0.terminate(pids)
            }
            fn kill(&self, pids: &[u32]) -> Result<()> {
                self.0.kill(pids)
            }
        }

        let reclaimer = PortReclaimer::with_signaller(
            Box::new(ScriptedProber::new(responses)),
            Box::new(SharedSignaller(signaller.clone())),
            Duration::ZERO,
        );

        (reclaimer, signaller)
    }

    #[test]
    fn test_free_port_sends_zero_signals() {
        let (reclaimer, signaller) = reclaimer_with(vec![vec![]]);

        let outcome = reclaimer.reclaim(8080).unwrap();

        assert_eq!(outcome, ReclaimOutcome::AlreadyFree);
        assert!(signaller.terminated.lock().unwrap().is_empty());
        assert!(signaller.killed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_graceful_clears_port_no_forced_signal() {
        // First probe finds listeners, re-probe after the grace period is empty
        let (reclaimer, signaller) = reclaimer_with(vec![vec![100, 200], vec![]]);

        let outcome = reclaimer.reclaim(8080).unwrap();

        assert_eq!(
            outcome,
            ReclaimOutcome::Reclaimed {
                terminated: 2,
                killed: 0
            }
        );
        assert_eq!(*signaller.terminated.lock().unwrap(), vec![vec![100, 200]]);
        assert!(signaller.killed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_survivors_are_force_killed() {
        let (reclaimer, signaller) = reclaimer_with(vec![vec![100, 200], vec![200]]);

        let outcome = reclaimer.reclaim(8080).unwrap();

        assert_eq!(
            outcome,
            ReclaimOutcome::Reclaimed {
                terminated: 2,
                killed: 1
            }
        );
        assert_eq!(*signaller.terminated.lock().unwrap(), vec![vec![100, 200]]);
        assert_eq!(*signaller.killed.lock().unwrap(), vec![vec![200]]);
    }

    #[test]
    fn test_graceful_always_precedes_forced() {
        let (reclaimer, signaller) = reclaimer_with(vec![vec![7], vec![7]]);

        reclaimer.reclaim(8080).unwrap();

        // Exactly one batch of each, graceful sent to the original set
        assert_eq!(signaller.terminated.lock().unwrap().len(), 1);
        assert_eq!(signaller.killed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_is_pid_alive() {
        assert!(is_pid_alive(std::process::id()));

        // A reaped child is no longer alive
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(!is_pid_alive(pid));
    }

    #[test]
    fn test_signals_are_batched_not_sequential() {
        let (reclaimer, signaller) = reclaimer_with(vec![vec![1, 2, 3], vec![]]);

        reclaimer.reclaim(8080).unwrap();

        // One terminate call covering all pids, not one call per pid
        let batches = signaller.terminated.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![1, 2, 3]);
    }
}
