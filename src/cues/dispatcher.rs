//! Cue dispatcher: fans cues out to web clients and the local fallback chain

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Cue, CueBackend};

/// Stateless sink for cues emitted by the phase engine.
///
/// Each cue goes to every subscribed client stream, then to the first local
/// backend that manages to play it. Failures never leave this type.
pub struct CueDispatcher {
    backends: Vec<Arc<dyn CueBackend>>,
    events_tx: broadcast::Sender<Cue>,
}

impl CueDispatcher {
    /// Create a dispatcher with backends tried in the given order
    pub fn new(backends: Vec<Arc<dyn CueBackend>>) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self { backends, events_tx }
    }

    /// A dispatcher that only forwards cues to subscribers
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    /// Subscribe to every cue that is dispatched while audio is enabled
    pub fn subscribe(&self) -> broadcast::Receiver<Cue> {
        self.events_tx.subscribe()
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Play `cues` in order. A no-op when audio is disabled.
    pub fn dispatch(&self, cues: &[Cue], audio_enabled: bool) {
        if cues.is_empty() {
            return;
        }
        if !audio_enabled {
            debug!("Audio disabled, dropping {} cue(s)", cues.len());
            return;
        }

        for cue in cues {
            // No subscribers is the normal headless case
            let _ = self.events_tx.send(cue.clone());
            self.play(cue);
        }
    }

    fn play(&self, cue: &Cue) {
        for backend in &self.backends {
            let result = match cue {
                Cue::Beep => backend.play_beep(),
                Cue::Speak(text) => backend.speak(text),
            };
            match result {
                Ok(()) => {
                    debug!("Cue {:?} played by {}", cue, backend.name());
                    return;
                }
                Err(e) => debug!("Backend {} skipped cue {:?}: {}", backend.name(), cue, e),
            }
        }

        if !self.backends.is_empty() {
            warn!("No audio backend could play cue {:?}", cue);
        }
    }
}
