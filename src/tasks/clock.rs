//! Drift-correcting tick clock

use std::time::Duration;

use tokio::time::Instant;

/// Derives whole ticks from elapsed monotonic time since an anchor.
///
/// Wake-ups that arrive late (throttled timers, a suspended host) are caught
/// up in one go instead of stretching the workout.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    anchor: Option<Instant>,
    issued: u32,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            anchor: None,
            issued: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    /// (Re)anchor at `now`; the first tick falls one period later
    pub fn start(&mut self, now: Instant) {
        self.anchor = Some(now);
        self.issued = 0;
    }

    pub fn stop(&mut self) {
        self.anchor = None;
        self.issued = 0;
    }

    /// When the next tick becomes due, or `None` while stopped
    pub fn next_deadline(&self) -> Option<Instant> {
        self.anchor
            .map(|anchor| anchor + self.period * self.issued.saturating_add(1))
    }

    /// Number of ticks that became due since the last call
    pub fn take_due(&mut self, now: Instant) -> u32 {
        let Some(anchor) = self.anchor else {
            return 0;
        };

        let elapsed = now.saturating_duration_since(anchor);
        let total = u32::try_from(elapsed.as_nanos() / self.period.as_nanos()).unwrap_or(u32::MAX);
        let due = total.saturating_sub(self.issued);
        self.issued = self.issued.max(total);
        due
    }
}
