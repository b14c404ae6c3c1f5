//! Audio cue module
//!
//! The phase engine emits symbolic cues; this module realizes them through
//! whatever playback backends the host has, degrading silently when none work.

pub mod backends;
pub mod dispatcher;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types
pub use backends::{LogBackend, SpeechCommand, TerminalBell};
pub use dispatcher::CueDispatcher;

/// A symbolic request for audio feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Cue {
    Beep,
    Speak(String),
}

impl Cue {
    pub fn speak(text: impl Into<String>) -> Self {
        Cue::Speak(text.into())
    }
}

/// Why a backend could not realize a cue
#[derive(Debug, Error)]
pub enum CueError {
    /// The backend has no way to play this kind of cue
    #[error("{0} does not support this cue")]
    Unsupported(&'static str),

    /// Spawning or writing to the playback device failed
    #[error("playback failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A playback capability: tone generator, speech engine, terminal, ...
pub trait CueBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn play_beep(&self) -> Result<(), CueError>;

    fn speak(&self, text: &str) -> Result<(), CueError>;
}
