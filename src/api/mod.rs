//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures,
//! and serves the bundled web UI for every other path.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    handler::Handler,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/state", get(state_handler))
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/events", get(events_handler))
        .fallback(api_not_found);

    // Client-side routes fall through to index.html
    let web_ui = ServeDir::new(&state.static_dir)
        .fallback(spa_fallback.with_state(Arc::clone(&state)));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .fallback_service(web_ui)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
