//! User-configured workout settings

use serde::{Deserialize, Serialize};

/// Longest phase duration accepted at the boundary, in seconds
pub const MAX_DURATION_SECS: u32 = 3600;
/// Largest round or set count accepted at the boundary
pub const MAX_COUNT: u32 = 99;
/// Longest prepare countdown accepted at the boundary, in seconds
pub const MAX_PREPARE_SECS: u32 = 60;

/// Workout configuration, persisted as a flat camelCase JSON record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub workout_time: u32,
    pub rest_time: u32,
    pub rounds_per_set: u32,
    pub number_of_sets: u32,
    pub set_rest_time: u32,
    pub audio_enabled: bool,
    /// Optional "get ready" countdown before the first workout; 0 skips it
    pub prepare_time: u32,
}

impl Settings {
    /// Clamp every field into its accepted range.
    ///
    /// The phase engine assumes positive durations and counts, so anything
    /// coming from storage or the network goes through here first.
    pub fn sanitized(self) -> Self {
        Self {
            workout_time: self.workout_time.clamp(1, MAX_DURATION_SECS),
            rest_time: self.rest_time.clamp(1, MAX_DURATION_SECS),
            rounds_per_set: self.rounds_per_set.clamp(1, MAX_COUNT),
            number_of_sets: self.number_of_sets.clamp(1, MAX_COUNT),
            set_rest_time: self.set_rest_time.clamp(1, MAX_DURATION_SECS),
            audio_enabled: self.audio_enabled,
            prepare_time: self.prepare_time.min(MAX_PREPARE_SECS),
        }
    }

    /// Duration of the idle ready state and of a fresh run's first phase
    pub fn initial_duration(&self) -> u32 {
        if self.prepare_time > 0 {
            self.prepare_time
        } else {
            self.workout_time
        }
    }

    /// Total seconds of a full run, prepare countdown included
    pub fn total_workout_seconds(&self) -> u64 {
        let rounds = u64::from(self.rounds_per_set) * u64::from(self.number_of_sets);
        let rests = u64::from(self.rounds_per_set.saturating_sub(1)) * u64::from(self.number_of_sets);
        let set_rests = u64::from(self.number_of_sets.saturating_sub(1));

        u64::from(self.prepare_time)
            + rounds * u64::from(self.workout_time)
            + rests * u64::from(self.rest_time)
            + set_rests * u64::from(self.set_rest_time)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workout_time: 40,
            rest_time: 20,
            rounds_per_set: 5,
            number_of_sets: 5,
            set_rest_time: 60,
            audio_enabled: true,
            prepare_time: 0,
        }
    }
}

/// A partial settings record; present fields override a base [`Settings`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds_per_set: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_rest_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepare_time: Option<u32>,
}

impl SettingsPatch {
    /// Overlay this patch on `base` and clamp the result
    pub fn apply_to(&self, base: &Settings) -> Settings {
        Settings {
            workout_time: self.workout_time.unwrap_or(base.workout_time),
            rest_time: self.rest_time.unwrap_or(base.rest_time),
            rounds_per_set: self.rounds_per_set.unwrap_or(base.rounds_per_set),
            number_of_sets: self.number_of_sets.unwrap_or(base.number_of_sets),
            set_rest_time: self.set_rest_time.unwrap_or(base.set_rest_time),
            audio_enabled: self.audio_enabled.unwrap_or(base.audio_enabled),
            prepare_time: self.prepare_time.unwrap_or(base.prepare_time),
        }
        .sanitized()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
