//! Pure phase transitions
//!
//! Every function here maps `(state, settings)` to a new state plus the cues
//! to play. Nothing is mutated in place, so the owner can swap the state
//! atomically after each call.

use crate::{
    cues::Cue,
    state::{Phase, Settings, TimerState},
};

pub const START_PHRASE: &str = "Start";
pub const GET_READY_PHRASE: &str = "Get ready";
pub const BREAK_PHRASE: &str = "Break";
pub const SET_COMPLETE_PHRASE: &str = "Set complete";
pub const WORKOUT_COMPLETE_PHRASE: &str = "Workout complete";

/// Remaining-second values that trigger the countdown beep
const COUNTDOWN_SECONDS: [u32; 3] = [3, 2, 1];

/// Apply one one-second tick.
///
/// A tick on a paused or stopped timer returns the state unchanged.
pub fn advance(state: &TimerState, settings: &Settings) -> (TimerState, Vec<Cue>) {
    if !state.is_ticking() {
        return (state.clone(), Vec::new());
    }

    let remaining = state.time_remaining.saturating_sub(1);
    if remaining == 0 {
        return next_phase(state, settings);
    }

    let mut cues = Vec::new();
    if state.phase.has_countdown_cue() && COUNTDOWN_SECONDS.contains(&remaining) {
        cues.push(Cue::Beep);
    }

    let next = TimerState {
        time_remaining: remaining,
        ..state.clone()
    };
    (next, cues)
}

/// Leave the current phase once its countdown has run out
pub fn next_phase(state: &TimerState, settings: &Settings) -> (TimerState, Vec<Cue>) {
    match state.phase {
        Phase::Prepare | Phase::Rest | Phase::SetRest => enter_workout(state, settings),
        Phase::Workout if state.current_round < settings.rounds_per_set => {
            let next = TimerState {
                phase: Phase::Rest,
                current_round: state.current_round + 1,
                time_remaining: settings.rest_time,
                total_time: settings.rest_time,
                ..state.clone()
            };
            (next, vec![Cue::speak(BREAK_PHRASE)])
        }
        Phase::Workout if state.current_set < settings.number_of_sets => {
            let next = TimerState {
                phase: Phase::SetRest,
                current_round: 1,
                current_set: state.current_set + 1,
                time_remaining: settings.set_rest_time,
                total_time: settings.set_rest_time,
                ..state.clone()
            };
            (next, vec![Cue::speak(SET_COMPLETE_PHRASE)])
        }
        Phase::Workout => (complete(state), vec![Cue::speak(WORKOUT_COMPLETE_PHRASE)]),
        Phase::Complete => (state.clone(), Vec::new()),
    }
}

fn enter_workout(state: &TimerState, settings: &Settings) -> (TimerState, Vec<Cue>) {
    let next = TimerState {
        phase: Phase::Workout,
        time_remaining: settings.workout_time,
        total_time: settings.workout_time,
        ..state.clone()
    };
    (next, vec![Cue::speak(START_PHRASE), Cue::Beep])
}

fn complete(state: &TimerState) -> TimerState {
    TimerState {
        phase: Phase::Complete,
        is_running: false,
        is_paused: false,
        time_remaining: 0,
        total_time: 0,
        ..state.clone()
    }
}

/// Begin a fresh run, or resume a paused one
pub fn start(state: &TimerState, settings: &Settings) -> (TimerState, Vec<Cue>) {
    if state.is_running {
        let next = TimerState {
            is_paused: false,
            ..state.clone()
        };
        return (next, Vec::new());
    }

    let fresh = TimerState {
        is_running: true,
        ..TimerState::ready(settings)
    };

    if settings.prepare_time > 0 {
        (fresh, vec![Cue::speak(GET_READY_PHRASE)])
    } else {
        enter_workout(&fresh, settings)
    }
}

/// Toggle pause on a running timer; no effect otherwise
pub fn pause(state: &TimerState) -> TimerState {
    if !state.is_running {
        return state.clone();
    }
    TimerState {
        is_paused: !state.is_paused,
        ..state.clone()
    }
}

/// Discard progress and return to the idle ready state
pub fn stop(settings: &Settings) -> TimerState {
    TimerState::ready(settings)
}

/// Recompute the idle state for new settings.
///
/// A run in flight keeps its current phase timing; the new values take
/// effect from the next phase on. A completed run is left as is.
pub fn reconcile_settings(state: &TimerState, settings: &Settings) -> TimerState {
    if state.is_idle() {
        TimerState::ready(settings)
    } else {
        state.clone()
    }
}
