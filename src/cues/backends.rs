//! Local cue backends

use std::io::Write;

use tracing::info;

use super::{CueBackend, CueError};
use crate::services::spawn_speech;

/// Speaks phrases through an external TTS program such as `espeak` or `say`
#[derive(Debug, Clone)]
pub struct SpeechCommand {
    program: String,
    args: Vec<String>,
}

impl SpeechCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a command line like `"espeak -s 160"` into program and arguments
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CueBackend for SpeechCommand {
    fn name(&self) -> &'static str {
        "speech-command"
    }

    fn play_beep(&self) -> Result<(), CueError> {
        Err(CueError::Unsupported(self.name()))
    }

    fn speak(&self, text: &str) -> Result<(), CueError> {
        spawn_speech(&self.program, &self.args, text)?;
        Ok(())
    }
}

/// Rings the terminal bell for beeps and prints spoken phrases to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CueBackend for TerminalBell {
    fn name(&self) -> &'static str {
        "terminal-bell"
    }

    fn play_beep(&self) -> Result<(), CueError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), CueError> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "\x07>> {}", text)?;
        Ok(())
    }
}

/// Last resort: records the cue in the log and always succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackend;

impl CueBackend for LogBackend {
    fn name(&self) -> &'static str {
        "log"
    }

    fn play_beep(&self) -> Result<(), CueError> {
        info!("Cue: beep");
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), CueError> {
        info!("Cue: \"{}\"", text);
        Ok(())
    }
}
