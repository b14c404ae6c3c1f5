//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode, Uri},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use tokio_stream::{
    wrappers::{BroadcastStream, WatchStream},
    Stream, StreamExt,
};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, SettingsPatch, TimerState},
    tasks::TimerError,
};
use super::responses::{
    ApiResponse, ErrorResponse, HealthResponse, SettingsResponse, StateResponse,
};

fn timer_unavailable(action: &str, e: TimerError) -> StatusCode {
    error!("Failed to {} timer: {}", action, e);
    StatusCode::SERVICE_UNAVAILABLE
}

/// Handle POST /api/start - Start a workout or resume a paused one
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let before = state.get_timer_state();
    let timer_state = state.start().await.map_err(|e| timer_unavailable("start", e))?;

    let message = start_message(&before, &timer_state);
    info!("Start endpoint called - {}", message.to_lowercase());
    Ok(Json(ApiResponse::for_state(message.to_string(), timer_state)))
}

fn start_message(before: &TimerState, after: &TimerState) -> &'static str {
    if before.is_ticking() && after.is_ticking() {
        "Workout already running"
    } else if before.is_paused {
        "Workout resumed"
    } else {
        "Workout started"
    }
}

/// Handle POST /api/pause - Toggle pause on a running workout
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer_state = state.pause().await.map_err(|e| timer_unavailable("pause", e))?;

    let message = match (timer_state.is_running, timer_state.is_paused) {
        (false, _) => "Timer is not running",
        (true, true) => "Workout paused",
        (true, false) => "Workout resumed",
    };
    info!("Pause endpoint called - {}", message.to_lowercase());
    Ok(Json(ApiResponse::for_state(message.to_string(), timer_state)))
}

/// Handle POST /api/stop - Stop and reset the workout
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer_state = state.stop().await.map_err(|e| timer_unavailable("stop", e))?;

    info!("Stop endpoint called - timer reset");
    Ok(Json(ApiResponse::for_state("Workout stopped".to_string(), timer_state)))
}

/// Handle GET /api/state - Return the current countdown
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StateResponse {
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
        ..StateResponse::new(state.get_timer_state(), state.settings.get())
    })
}

/// Handle GET /api/settings - Return the current settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse::new(
        state.settings.get(),
        !state.settings.is_degraded(),
    ))
}

/// Handle PUT /api/settings - Merge, persist, and apply new settings
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    if patch.is_empty() {
        warn!("Settings update with no fields, nothing to change");
    }

    let (settings, _) = state
        .update_settings(&patch)
        .await
        .map_err(|e| timer_unavailable("update settings on", e))?;

    Ok(Json(SettingsResponse::new(
        settings,
        !state.settings.is_degraded(),
    )))
}

/// Handle GET /api/events - Stream state changes and cues as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream client connected");

    let states = WatchStream::new(state.timer.subscribe())
        .map(|timer_state| Event::default().event("state").json_data(timer_state));

    // A lagging client skips cues it was too slow to take
    let cues = BroadcastStream::new(state.cues.subscribe())
        .filter_map(|cue| cue.ok())
        .map(|cue| Event::default().event("cue").json_data(cue));

    let events = states
        .merge(cues)
        .filter_map(|event| match event {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!("Failed to encode event: {}", e);
                None
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Unknown paths under /api
pub async fn api_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Unknown API path: {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("No API endpoint at {}", uri.path()))),
    )
}

/// Serve `index.html` for client-side routes; missing assets stay 404
pub async fn spa_fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    if is_asset_path(uri.path()) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let index = state.static_dir.join("index.html");
    match tokio::fs::read(&index).await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response(),
        Err(e) => {
            warn!("Cannot serve {}: {}", index.display(), e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// True when the last path segment looks like a file name
fn is_asset_path(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .map_or(false, |segment| segment.contains('.'))
}
