//! Persisted workout settings

use std::sync::{
    atomic::{AtomicBool, Ordering},
    RwLock,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{KeyValueStore, MemoryStore, StoreError};
use crate::state::{Settings, SettingsPatch};

/// Key the settings record is stored under
pub const SETTINGS_KEY: &str = "hiitSettings";

/// Single owner of the user's [`Settings`].
///
/// Loads once at construction and writes through on every change. If the
/// backing store fails, the settings live on in memory for the session.
pub struct SettingsStore {
    backend: Box<dyn KeyValueStore>,
    current: RwLock<Settings>,
    degraded: AtomicBool,
}

impl SettingsStore {
    /// Load settings from `backend`, merging stored fields over the defaults
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let (settings, degraded) = match backend.get(SETTINGS_KEY) {
            Ok(Some(raw)) => match parse_stored(&raw) {
                Ok(patch) => {
                    info!("Loaded saved settings");
                    (patch.apply_to(&Settings::default()), false)
                }
                Err(e) => {
                    warn!("Saved settings are malformed, using defaults: {}", e);
                    (Settings::default(), false)
                }
            },
            Ok(None) => {
                info!("No saved settings, using defaults");
                (Settings::default(), false)
            }
            // The next save rewrites the unreadable file
            Err(StoreError::Json(e)) => {
                warn!("Settings file is malformed, using defaults: {}", e);
                (Settings::default(), false)
            }
            Err(e) => {
                warn!("Settings storage unavailable, keeping settings in memory: {}", e);
                (Settings::default(), true)
            }
        };

        Self {
            backend,
            current: RwLock::new(settings),
            degraded: AtomicBool::new(degraded),
        }
    }

    /// A store that never touches disk
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    /// Current settings snapshot
    pub fn get(&self) -> Settings {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Merge `patch` over the current settings, clamp, and persist
    pub fn update(&self, patch: &SettingsPatch) -> Settings {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = patch.apply_to(&guard);
        *guard = next.clone();
        drop(guard);

        self.persist(&next);
        next
    }

    /// True once a write has failed and changes are memory-only
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    fn persist(&self, settings: &Settings) {
        if self.is_degraded() {
            return;
        }

        let result = serde_json::to_string(settings)
            .map_err(StoreError::from)
            .and_then(|json| self.backend.set(SETTINGS_KEY, &json));

        if let Err(e) = result {
            warn!("Failed to save settings, continuing in memory only: {}", e);
            self.degraded.store(true, Ordering::SeqCst);
        }
    }
}

/// Read a stored record field by field, dropping values of the wrong type
fn parse_stored(raw: &str) -> Result<SettingsPatch, serde_json::Error> {
    let record: Map<String, Value> = serde_json::from_str(raw)?;

    Ok(SettingsPatch {
        workout_time: stored_field(&record, "workoutTime"),
        rest_time: stored_field(&record, "restTime"),
        rounds_per_set: stored_field(&record, "roundsPerSet"),
        number_of_sets: stored_field(&record, "numberOfSets"),
        set_rest_time: stored_field(&record, "setRestTime"),
        audio_enabled: stored_field(&record, "audioEnabled"),
        prepare_time: stored_field(&record, "prepareTime"),
    })
}

fn stored_field<T: DeserializeOwned>(record: &Map<String, Value>, key: &str) -> Option<T> {
    let value = record.get(key)?;
    match T::deserialize(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring saved {}: {}", key, e);
            None
        }
    }
}
