//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server: the
//! timer loop that owns the phase engine and the keep-awake watcher.

pub mod clock;
pub mod keep_awake;
pub mod ticker;

// Re-export main types
pub use clock::TickClock;
pub use keep_awake::keep_awake_task;
pub use ticker::{timer_channel, TimerCommand, TimerError, TimerHandle, TimerTask};
