//! Host process services module
//!
//! This module launches the external programs the timer leans on: a
//! text-to-speech engine and the idle/sleep inhibitor.

pub mod keep_awake;
pub mod speech;

// Re-export main types
pub use keep_awake::{KeepAwake, WakeLock};
pub use speech::{check_speech_available, spawn_speech};
