//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Settings, TimerState},
    utils::{format_time, progress_percent},
};

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
        }
    }

    /// Create a response describing the timer's run status
    pub fn for_state(message: String, state: TimerState) -> Self {
        let status = if state.is_complete() {
            "complete"
        } else if state.is_paused {
            "paused"
        } else if state.is_running {
            "running"
        } else {
            "ready"
        };
        Self::new(status.to_string(), message, state)
    }
}

/// Timer snapshot with display helpers for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub state: TimerState,
    pub settings: Settings,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub phase_label: String,
    /// Share of the current phase already elapsed, 0-100
    pub progress: f64,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl StateResponse {
    pub fn new(state: TimerState, settings: Settings) -> Self {
        Self {
            display: format_time(state.time_remaining),
            phase_label: state.phase.label().to_string(),
            progress: progress_percent(state.time_remaining, state.total_time),
            state,
            settings,
            uptime: String::new(),
            last_action: None,
            last_action_time: None,
        }
    }
}

/// Settings endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    /// False when settings could not be saved and live in memory only
    pub persisted: bool,
    /// Seconds a full run takes with these settings
    pub total_workout_seconds: u64,
}

impl SettingsResponse {
    pub fn new(settings: Settings, persisted: bool) -> Self {
        Self {
            total_workout_seconds: settings.total_workout_seconds(),
            settings,
            persisted,
        }
    }
}

/// Error body for API failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
