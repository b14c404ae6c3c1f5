//! Phase engine module
//!
//! Owns the timer state and the settings snapshot it runs against. Each
//! operation goes through a pure function in [`transition`] and replaces the
//! state wholesale.

pub mod transition;

use tracing::{debug, info};

use crate::{
    cues::Cue,
    state::{Phase, Settings, TimerState},
};

pub use transition::advance;

/// Finite-state machine over the workout phases
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    state: TimerState,
    settings: Settings,
}

impl PhaseEngine {
    /// Create an engine in the idle ready state
    pub fn new(settings: Settings) -> Self {
        Self {
            state: TimerState::ready(&settings),
            settings,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_ticking(&self) -> bool {
        self.state.is_ticking()
    }

    /// Advance one second
    pub fn tick(&mut self) -> Vec<Cue> {
        let (next, cues) = transition::advance(&self.state, &self.settings);
        if next.phase != self.state.phase {
            info!(
                "Phase {:?} -> {:?} (round {}, set {})",
                self.state.phase, next.phase, next.current_round, next.current_set
            );
        }
        self.state = next;
        cues
    }

    pub fn start(&mut self) -> Vec<Cue> {
        let resuming = self.state.is_running;
        let (next, cues) = transition::start(&self.state, &self.settings);
        if resuming {
            info!("Resuming workout at {}s remaining", next.time_remaining);
        } else {
            info!(
                "Starting workout: {} sets x {} rounds",
                self.settings.number_of_sets, self.settings.rounds_per_set
            );
        }
        self.state = next;
        cues
    }

    pub fn pause(&mut self) {
        self.state = transition::pause(&self.state);
        debug!("Pause toggled, paused={}", self.state.is_paused);
    }

    pub fn stop(&mut self) {
        self.state = transition::stop(&self.settings);
        info!("Timer stopped and reset");
    }

    /// Replace the settings snapshot; an in-flight phase keeps its timing
    pub fn update_settings(&mut self, settings: Settings) {
        self.state = transition::reconcile_settings(&self.state, &settings);
        self.settings = settings;
        debug!("Engine settings updated: {:?}", self.settings);
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }
}
