//! Keep-awake background task

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{services::WakeLock, state::TimerState};

/// Hold `lock` while the countdown is ticking.
///
/// A failed acquisition is not retried until the timer stops ticking and
/// starts again, so a host without an inhibitor logs once per run.
pub async fn keep_awake_task<L: WakeLock>(mut lock: L, mut state_rx: watch::Receiver<TimerState>) {
    info!("Starting keep-awake task");

    let mut gave_up = false;

    loop {
        let ticking = state_rx.borrow_and_update().is_ticking();

        if ticking && !lock.is_held() && !gave_up {
            if let Err(e) = lock.acquire() {
                warn!("Could not keep the host awake, continuing anyway: {}", e);
                gave_up = true;
            }
        } else if !ticking {
            gave_up = false;
            lock.release();
        }

        if state_rx.changed().await.is_err() {
            break;
        }
    }

    lock.release();
    info!("Keep-awake task stopped");
}
