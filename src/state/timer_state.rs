//! Timer state structure for the workout countdown

use serde::{Deserialize, Serialize};

use super::Settings;

/// One segment of the workout cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Ready state before a run, or the optional "get ready" countdown
    Prepare,
    Workout,
    Rest,
    SetRest,
    Complete,
}

impl Phase {
    /// Phases that beep on the last three seconds of their countdown
    pub fn has_countdown_cue(&self) -> bool {
        matches!(self, Phase::Workout | Phase::Rest | Phase::SetRest)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Prepare => "GET READY",
            Phase::Workout => "WORK",
            Phase::Rest => "REST",
            Phase::SetRest => "SET REST",
            Phase::Complete => "COMPLETE",
        }
    }
}

/// Ephemeral countdown state, re-derived from [`Settings`] on every reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    pub is_running: bool,
    pub is_paused: bool,
    /// 1-indexed round within the current set
    pub current_round: u32,
    /// 1-indexed set
    pub current_set: u32,
    pub time_remaining: u32,
    /// Full duration of the current phase
    pub total_time: u32,
}

impl TimerState {
    /// Idle ready state for the given settings
    pub fn ready(settings: &Settings) -> Self {
        let duration = settings.initial_duration();
        Self {
            phase: Phase::Prepare,
            is_running: false,
            is_paused: false,
            current_round: 1,
            current_set: 1,
            time_remaining: duration,
            total_time: duration,
        }
    }

    /// True when ticks should be applied
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// True for the idle state nobody has started yet
    pub fn is_idle(&self) -> bool {
        !self.is_running && self.phase == Phase::Prepare
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_uses_workout_time_without_prepare() {
        let state = TimerState::ready(&Settings::default());
        assert_eq!(state.phase, Phase::Prepare);
        assert!(state.is_idle());
        assert!(!state.is_ticking());
        assert_eq!(state.time_remaining, 40);
        assert_eq!(state.total_time, 40);
        assert_eq!((state.current_round, state.current_set), (1, 1));
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Phase::SetRest).unwrap(), "setrest");
        let state = serde_json::to_value(TimerState::ready(&Settings::default())).unwrap();
        assert_eq!(state["phase"], "prepare");
        assert_eq!(state["timeRemaining"], 40);
        assert_eq!(state["isRunning"], false);
    }

    #[test]
    fn countdown_cue_only_in_active_phases() {
        assert!(Phase::Workout.has_countdown_cue());
        assert!(Phase::Rest.has_countdown_cue());
        assert!(Phase::SetRest.has_countdown_cue());
        assert!(!Phase::Prepare.has_countdown_cue());
        assert!(!Phase::Complete.has_countdown_cue());
    }
}
