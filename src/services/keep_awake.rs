//! Idle/sleep inhibition while a workout is running

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

const INHIBIT_PROGRAM: &str = "systemd-inhibit";

/// Something that can keep the host from idling or sleeping
pub trait WakeLock: Send + 'static {
    fn is_held(&self) -> bool;

    /// Take the lock. A no-op if it is already held.
    fn acquire(&mut self) -> Result<(), String>;

    /// Drop the lock if held
    fn release(&mut self);
}

/// Holds an inhibitor child process (`systemd-inhibit ... sleep infinity`)
/// for as long as the host must stay awake
#[derive(Debug)]
pub struct KeepAwake {
    program: String,
    args: Vec<String>,
    inhibitor: Option<Child>,
}

impl Default for KeepAwake {
    fn default() -> Self {
        Self::with_command(
            INHIBIT_PROGRAM,
            [
                "--what=idle:sleep",
                "--who=just-hiit",
                "--why=Workout in progress",
                "--mode=block",
                "sleep",
                "infinity",
            ],
        )
    }
}

impl KeepAwake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program args..` as the inhibitor; it must run until killed
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            inhibitor: None,
        }
    }
}

impl WakeLock for KeepAwake {
    fn is_held(&self) -> bool {
        self.inhibitor.is_some()
    }

    fn acquire(&mut self) -> Result<(), String> {
        if self.inhibitor.is_some() {
            return Ok(());
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.program, e))?;

        info!("Keep-awake lock acquired");
        self.inhibitor = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        let Some(mut child) = self.inhibitor.take() else {
            return;
        };

        // The runtime reaps the killed child once it is dropped
        match child.start_kill() {
            Ok(()) => debug!("{} stopped", self.program),
            Err(e) => warn!("Failed to stop {}: {}", self.program, e),
        }
        info!("Keep-awake lock released");
    }
}

impl Drop for KeepAwake {
    fn drop(&mut self) {
        self.release();
    }
}
