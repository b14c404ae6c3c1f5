//! Just HIIT - An interval workout timer server
//! 
//! This library provides the workout phase engine, the cue dispatcher that
//! beeps and speaks phase changes, settings persistence, and the HTTP API
//! that drives the timer from a browser.

pub mod config;
pub mod state;
pub mod engine;
pub mod cues;
pub mod storage;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Phase, Settings, TimerState};
pub use engine::PhaseEngine;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
