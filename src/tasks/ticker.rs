//! Timer background task
//!
//! One task owns the [`PhaseEngine`]. Commands from the API and ticks from
//! the clock are handled in the same loop, so they can never interleave.

use std::{future, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{sleep_until, Instant},
};
use tracing::{debug, info, trace};

use super::clock::TickClock;
use crate::{
    cues::{Cue, CueDispatcher},
    engine::PhaseEngine,
    state::{Settings, TimerState},
};

/// Commands the UI layer can issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Stop,
    UpdateSettings(Settings),
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer task is not running")]
    Closed,
}

struct TimerRequest {
    command: TimerCommand,
    reply: oneshot::Sender<TimerState>,
}

impl std::fmt::Debug for TimerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRequest")
            .field("command", &self.command)
            .finish()
    }
}

/// Cloneable handle for issuing commands and reading timer snapshots
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands_tx: mpsc::Sender<TimerRequest>,
    state_rx: watch::Receiver<TimerState>,
}

impl TimerHandle {
    /// Queue a command and wait for the state it produced
    pub async fn send(&self, command: TimerCommand) -> Result<TimerState, TimerError> {
        let (reply, reply_rx) = oneshot::channel();
        self.commands_tx
            .send(TimerRequest { command, reply })
            .await
            .map_err(|_| TimerError::Closed)?;
        reply_rx.await.map_err(|_| TimerError::Closed)
    }

    pub async fn start(&self) -> Result<TimerState, TimerError> {
        self.send(TimerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<TimerState, TimerError> {
        self.send(TimerCommand::Pause).await
    }

    pub async fn stop(&self) -> Result<TimerState, TimerError> {
        self.send(TimerCommand::Stop).await
    }

    pub async fn update_settings(&self, settings: Settings) -> Result<TimerState, TimerError> {
        self.send(TimerCommand::UpdateSettings(settings)).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> TimerState {
        self.state_rx.borrow().clone()
    }

    /// Watch every state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state_rx.clone()
    }
}

/// The task side of a [`TimerHandle`]; drive it with [`TimerTask::run`]
pub struct TimerTask {
    engine: PhaseEngine,
    dispatcher: Arc<CueDispatcher>,
    commands_rx: mpsc::Receiver<TimerRequest>,
    state_tx: watch::Sender<TimerState>,
    clock: TickClock,
}

/// Create a connected handle and task ticking every `period`
pub fn timer_channel(
    engine: PhaseEngine,
    dispatcher: Arc<CueDispatcher>,
    period: Duration,
) -> (TimerHandle, TimerTask) {
    let (commands_tx, commands_rx) = mpsc::channel(32);
    let (state_tx, state_rx) = watch::channel(engine.state().clone());

    let handle = TimerHandle {
        commands_tx,
        state_rx,
    };
    let task = TimerTask {
        engine,
        dispatcher,
        commands_rx,
        state_tx,
        clock: TickClock::new(period),
    };
    (handle, task)
}

impl TimerTask {
    /// Run until every [`TimerHandle`] has been dropped
    pub async fn run(mut self) {
        info!("Starting timer task, tick every {:?}", self.clock.period());

        loop {
            let deadline = self.clock.next_deadline();
            tokio::select! {
                request = self.commands_rx.recv() => {
                    let Some(request) = request else { break };
                    self.handle(request);
                }
                _ = wait_until(deadline) => {
                    self.on_wake(Instant::now());
                }
            }
        }

        info!("Timer task stopped");
    }

    fn handle(&mut self, request: TimerRequest) {
        debug!("Timer command: {:?}", request.command);

        let cues = match request.command {
            TimerCommand::Start => self.engine.start(),
            TimerCommand::Pause => {
                self.engine.pause();
                Vec::new()
            }
            TimerCommand::Stop => {
                // Halt the clock first so no due tick lands on the reset state
                self.clock.stop();
                self.engine.stop();
                Vec::new()
            }
            TimerCommand::UpdateSettings(settings) => {
                self.engine.update_settings(settings);
                Vec::new()
            }
        };

        self.sync_clock(Instant::now());
        let state = self.publish();
        self.dispatcher
            .dispatch(&cues, self.engine.settings().audio_enabled);

        // The requester may have given up waiting
        let _ = request.reply.send(state);
    }

    fn on_wake(&mut self, now: Instant) {
        let due = self.clock.take_due(now);
        if due > 1 {
            debug!("Timer woke late, catching up {} ticks", due);
        }

        let mut cues = Vec::new();
        for _ in 0..due {
            if !self.engine.is_ticking() {
                break;
            }
            cues.extend(self.engine.tick());
        }

        if due > 1 {
            cues = collapse_catch_up(cues);
        }

        self.sync_clock(now);
        let state = self.publish();
        trace!("Tick: {:?} {}s remaining", state.phase, state.time_remaining);
        self.dispatcher
            .dispatch(&cues, self.engine.settings().audio_enabled);
    }

    /// Run the clock exactly while the engine accepts ticks
    fn sync_clock(&mut self, now: Instant) {
        match (self.engine.is_ticking(), self.clock.is_running()) {
            (true, false) => self.clock.start(now),
            (false, true) => self.clock.stop(),
            _ => {}
        }
    }

    fn publish(&self) -> TimerState {
        let state = self.engine.state().clone();
        self.state_tx.send_replace(state.clone());
        state
    }
}

/// Cues from several ticks applied at once: keep only the latest
/// announcement and a single beep, in their original order
fn collapse_catch_up(cues: Vec<Cue>) -> Vec<Cue> {
    let last_speak = cues.iter().rposition(|cue| matches!(cue, Cue::Speak(_)));
    let last_beep = cues.iter().rposition(|cue| *cue == Cue::Beep);

    cues.into_iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) == last_speak || Some(*i) == last_beep)
        .map(|(_, cue)| cue)
        .collect()
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    fn settings() -> Settings {
        Settings {
            workout_time: 5,
            rest_time: 3,
            rounds_per_set: 2,
            number_of_sets: 1,
            set_rest_time: 10,
            audio_enabled: true,
            prepare_time: 0,
        }
    }

    fn spawn_timer(settings: Settings) -> (TimerHandle, Arc<CueDispatcher>) {
        let dispatcher = Arc::new(CueDispatcher::silent());
        let (handle, task) = timer_channel(
            PhaseEngine::new(settings),
            Arc::clone(&dispatcher),
            Duration::from_secs(1),
        );
        tokio::spawn(task.run());
        (handle, dispatcher)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_while_running() {
        let (timer, _) = spawn_timer(settings());

        let started = timer.start().await.unwrap();
        assert_eq!(started.phase, Phase::Workout);
        assert_eq!(started.time_remaining, 5);

        sleep_ms(3500).await;
        assert_eq!(timer.snapshot().time_remaining, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_timer_does_not_tick() {
        let (timer, _) = spawn_timer(settings());
        sleep_ms(10_000).await;
        assert_eq!(timer.snapshot(), TimerState::ready(&settings()));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_resume_continues() {
        let (timer, _) = spawn_timer(settings());
        timer.start().await.unwrap();
        sleep_ms(2500).await;

        let paused = timer.pause().await.unwrap();
        assert!(paused.is_paused);
        assert_eq!(paused.time_remaining, 3);

        sleep_ms(10_000).await;
        assert_eq!(timer.snapshot(), paused);

        let resumed = timer.start().await.unwrap();
        assert!(resumed.is_ticking());
        assert_eq!(resumed.time_remaining, 3);

        sleep_ms(1500).await;
        assert_eq!(timer.snapshot().time_remaining, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticks_and_resets() {
        let (timer, _) = spawn_timer(settings());
        timer.start().await.unwrap();
        sleep_ms(2500).await;

        let stopped = timer.stop().await.unwrap();
        assert_eq!(stopped, TimerState::ready(&settings()));

        sleep_ms(5000).await;
        assert_eq!(timer.snapshot(), stopped);

        assert_eq!(timer.stop().await.unwrap(), stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_through_to_completion() {
        let (timer, _) = spawn_timer(settings());
        timer.start().await.unwrap();

        // 5 + 3 + 5 seconds of phases
        sleep_ms(13_500).await;
        let done = timer.snapshot();
        assert_eq!(done.phase, Phase::Complete);
        assert!(!done.is_running);
        assert_eq!(done.time_remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cues_reach_subscribers() {
        let (timer, dispatcher) = spawn_timer(settings());
        let mut cues = dispatcher.subscribe();

        timer.start().await.unwrap();
        assert_eq!(cues.recv().await.unwrap(), Cue::speak("Start"));
        assert_eq!(cues.recv().await.unwrap(), Cue::Beep);

        // 5 -> 3, 2, 1 beep, then the break announcement
        sleep_ms(5500).await;
        for _ in 0..3 {
            assert_eq!(cues.recv().await.unwrap(), Cue::Beep);
        }
        assert_eq!(cues.recv().await.unwrap(), Cue::speak("Break"));
    }

    #[test]
    fn catch_up_keeps_latest_announcement_and_one_beep() {
        let burst = vec![
            Cue::Beep,
            Cue::Beep,
            Cue::speak("Break"),
            Cue::Beep,
            Cue::speak("Start"),
            Cue::Beep,
        ];
        assert_eq!(
            collapse_catch_up(burst),
            vec![Cue::speak("Start"), Cue::Beep]
        );
        assert_eq!(collapse_catch_up(vec![Cue::Beep]), vec![Cue::Beep]);
        assert!(collapse_catch_up(Vec::new()).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn late_wake_plays_one_announcement() {
        let dispatcher = Arc::new(CueDispatcher::silent());
        let (timer, mut task) = timer_channel(
            PhaseEngine::new(settings()),
            Arc::clone(&dispatcher),
            Duration::from_secs(1),
        );
        let mut cues = dispatcher.subscribe();

        // Drive the task by hand to simulate a host that slept through 8s
        let (reply, _reply_rx) = oneshot::channel();
        task.handle(TimerRequest {
            command: TimerCommand::Start,
            reply,
        });
        assert_eq!(cues.recv().await.unwrap(), Cue::speak("Start"));
        assert_eq!(cues.recv().await.unwrap(), Cue::Beep);

        task.on_wake(Instant::now() + Duration::from_secs(8));
        let state = timer.snapshot();
        assert_eq!(state.phase, Phase::Workout);
        assert_eq!(state.current_round, 2);

        assert_eq!(cues.recv().await.unwrap(), Cue::speak("Start"));
        assert_eq!(cues.recv().await.unwrap(), Cue::Beep);
        assert!(cues.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_settings_update_resets_ready_duration() {
        let (timer, _) = spawn_timer(settings());
        let updated = timer
            .update_settings(Settings {
                workout_time: 45,
                ..settings()
            })
            .await
            .unwrap();
        assert_eq!(updated.time_remaining, 45);
        assert_eq!(updated.total_time, 45);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_published_state() {
        let (timer, _) = spawn_timer(settings());
        let mut rx = timer.subscribe();
        timer.start().await.unwrap();

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_running);
    }
}
