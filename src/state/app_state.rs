//! Main application state management

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{Settings, SettingsPatch, TimerState};
use crate::{
    cues::CueDispatcher,
    storage::SettingsStore,
    tasks::{TimerError, TimerHandle},
};

/// Shared state behind every HTTP handler
pub struct AppState {
    /// Persisted user settings
    pub settings: SettingsStore,
    /// Command handle to the timer task
    pub timer: TimerHandle,
    /// Serializes settings updates so the store and the engine agree on order
    update_lock: tokio::sync::Mutex<()>,
    /// Cue fan-out, for streaming to web clients
    pub cues: Arc<CueDispatcher>,
    /// Directory holding the bundled web UI
    pub static_dir: PathBuf,
    /// Server start, for uptime
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around a running timer task
    pub fn new(
        settings: SettingsStore,
        timer: TimerHandle,
        cues: Arc<CueDispatcher>,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            settings,
            timer,
            update_lock: tokio::sync::Mutex::new(()),
            cues,
            static_dir,
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a fresh workout, or resume a paused one
    pub async fn start(&self) -> Result<TimerState, TimerError> {
        let state = self.timer.start().await?;
        self.record_action("start");
        Ok(state)
    }

    /// Toggle pause
    pub async fn pause(&self) -> Result<TimerState, TimerError> {
        let state = self.timer.pause().await?;
        self.record_action(if state.is_paused { "pause" } else { "resume" });
        Ok(state)
    }

    /// Stop and reset to the ready state
    pub async fn stop(&self) -> Result<TimerState, TimerError> {
        let state = self.timer.stop().await?;
        self.record_action("stop");
        Ok(state)
    }

    /// Persist a settings change and hand the result to the timer
    pub async fn update_settings(
        &self,
        patch: &SettingsPatch,
    ) -> Result<(Settings, TimerState), TimerError> {
        let _guard = self.update_lock.lock().await;
        let settings = self.settings.update(patch);
        info!("Settings updated: {:?}", settings);
        let state = self.timer.update_settings(settings.clone()).await?;
        self.record_action("update-settings");
        Ok((settings, state))
    }

    /// Current timer snapshot
    pub fn get_timer_state(&self) -> TimerState {
        self.timer.snapshot()
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
