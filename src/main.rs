//! Just HIIT - An interval workout timer server
//! 
//! This is the main entry point for the just-hiit application.

use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};

use just_hiit::{
    config::Config,
    state::AppState,
    api::create_router,
    cues::{CueBackend, CueDispatcher, LogBackend, SpeechCommand, TerminalBell},
    engine::PhaseEngine,
    services::{check_speech_available, KeepAwake},
    storage::{JsonFileStore, SettingsStore},
    tasks::{keep_awake_task, timer_channel},
    utils::shutdown_signal,
};

/// Cue backends in fallback order
async fn build_cue_backends(config: &Config) -> Vec<Arc<dyn CueBackend>> {
    let mut backends: Vec<Arc<dyn CueBackend>> = Vec::new();

    if !config.no_speech {
        match SpeechCommand::from_command_line(&config.speech_command) {
            Some(speech) => {
                // Keep it anyway; a missing program only costs a failed spawn per cue
                if let Err(e) = check_speech_available(speech.program()).await {
                    warn!("{}", e);
                }
                backends.push(Arc::new(speech));
            }
            None => warn!("Empty speech command, spoken cues disabled"),
        }
    }

    backends.push(Arc::new(TerminalBell));
    backends.push(Arc::new(LogBackend));
    backends
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("just_hiit={},tower_http=info", config.log_level()))
        .init();

    info!("Starting just-hiit server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, static_dir={}, settings_file={}",
          config.host, config.port, config.static_dir.display(), config.settings_file.display());

    if !config.static_dir.join("index.html").exists() {
        warn!("No index.html in {}, only the API will be useful", config.static_dir.display());
    }

    // Load saved settings, falling back to defaults
    let settings = SettingsStore::load(Box::new(JsonFileStore::new(config.settings_file.clone())));
    info!("Workout settings: {:?}", settings.get());

    let cues = Arc::new(CueDispatcher::new(build_cue_backends(&config).await));
    info!("Cue backends: {}", cues.backend_names().join(" -> "));

    // Start the timer background task
    let engine = PhaseEngine::new(settings.get());
    let (timer, timer_task) = timer_channel(engine, Arc::clone(&cues), Duration::from_secs(1));
    tokio::spawn(timer_task.run());

    if config.no_keep_awake {
        info!("Keep-awake disabled");
    } else {
        tokio::spawn(keep_awake_task(KeepAwake::new(), timer.subscribe()));
    }

    if config.autostart {
        let state = timer.start().await?;
        info!("Autostarted workout: {:?} {}s", state.phase, state.time_remaining);
    }

    // Create application state
    let state = Arc::new(AppState::new(
        settings,
        timer,
        cues,
        config.static_dir.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /api/state    - Current timer state");
    info!("  POST /api/start    - Start or resume the workout");
    info!("  POST /api/pause    - Pause or resume the workout");
    info!("  POST /api/stop     - Stop and reset the workout");
    info!("  GET  /api/settings - Current workout settings");
    info!("  PUT  /api/settings - Update workout settings");
    info!("  GET  /api/events   - Live state and cue stream (SSE)");
    info!("  GET  /health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
