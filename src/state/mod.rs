//! State management module
//! 
//! This module contains the settings record, the countdown state, and the
//! shared application state handed to the HTTP layer.

pub mod app_state;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use settings::{Settings, SettingsPatch};
pub use timer_state::{Phase, TimerState};
