//! Settings persistence module
//!
//! A flat key-value store (file-backed or in-memory) and the settings store
//! that keeps the workout configuration in it.

pub mod kv;
pub mod settings_store;

use thiserror::Error;

// Re-export main types
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use settings_store::{SettingsStore, SETTINGS_KEY};

/// Errors raised by a key-value backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}
