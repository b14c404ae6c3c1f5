use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use just_hiit::{
    create_router,
    cues::CueDispatcher,
    engine::PhaseEngine,
    state::AppState,
    storage::SettingsStore,
    tasks::timer_channel,
};

const INDEX_HTML: &str = "<!doctype html><title>Just HIIT</title>";

struct TestApp {
    router: Router,
    _static_dir: TempDir,
}

fn test_app() -> TestApp {
    let static_dir = TempDir::new().unwrap();
    std::fs::write(static_dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir(static_dir.path().join("assets")).unwrap();
    std::fs::write(static_dir.path().join("assets/app.js"), "console.log('hiit')").unwrap();

    let settings = SettingsStore::in_memory();
    let cues = Arc::new(CueDispatcher::silent());
    let (timer, task) = timer_channel(
        PhaseEngine::new(settings.get()),
        Arc::clone(&cues),
        Duration::from_secs(1),
    );
    tokio::spawn(task.run());

    let state = Arc::new(AppState::new(
        settings,
        timer,
        cues,
        static_dir.path().to_path_buf(),
    ));

    TestApp {
        router: create_router(state),
        _static_dir: static_dir,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn state_starts_ready() {
    let app = test_app();
    let (status, body) = send_json(&app, Method::GET, "/api/state", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["phase"], "prepare");
    assert_eq!(body["state"]["isRunning"], false);
    assert_eq!(body["state"]["timeRemaining"], 40);
    assert_eq!(body["display"], "00:40");
    assert_eq!(body["settings"]["workoutTime"], 40);
    assert!(body["lastAction"].is_null());
}

#[tokio::test]
async fn start_pause_resume_stop() {
    let app = test_app();

    let (status, started) = send_json(&app, Method::POST, "/api/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["status"], "running");
    assert_eq!(started["state"]["phase"], "workout");
    assert_eq!(started["state"]["isRunning"], true);

    let (_, paused) = send_json(&app, Method::POST, "/api/pause", None).await;
    assert_eq!(paused["status"], "paused");
    assert_eq!(paused["state"]["isPaused"], true);

    let (_, resumed) = send_json(&app, Method::POST, "/api/pause", None).await;
    assert_eq!(resumed["status"], "running");
    assert_eq!(resumed["message"], "Workout resumed");

    let (_, stopped) = send_json(&app, Method::POST, "/api/stop", None).await;
    assert_eq!(stopped["status"], "ready");
    assert_eq!(stopped["state"]["phase"], "prepare");
    assert_eq!(stopped["state"]["timeRemaining"], 40);

    let (_, state) = send_json(&app, Method::GET, "/api/state", None).await;
    assert_eq!(state["lastAction"], "stop");
}

#[tokio::test]
async fn pause_when_idle_is_a_no_op() {
    let app = test_app();
    let (status, body) = send_json(&app, Method::POST, "/api/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["state"]["isPaused"], false);
}

#[tokio::test]
async fn settings_update_merges_and_clamps() {
    let app = test_app();

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "workoutTime": 5000, "roundsPerSet": 0, "audioEnabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["workoutTime"], 3600);
    assert_eq!(body["settings"]["roundsPerSet"], 1);
    assert_eq!(body["settings"]["audioEnabled"], false);
    // Untouched fields keep their defaults
    assert_eq!(body["settings"]["restTime"], 20);
    assert_eq!(body["persisted"], true);

    let (_, settings) = send_json(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(settings["settings"]["workoutTime"], 3600);

    // The idle countdown follows the new workout length
    let (_, state) = send_json(&app, Method::GET, "/api/state", None).await;
    assert_eq!(state["state"]["timeRemaining"], 3600);
}

#[tokio::test]
async fn settings_update_rejects_malformed_body() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "workoutTime": -5 })),
    )
    .await;
    assert!(status.is_client_error());

    let (_, settings) = send_json(&app, Method::GET, "/api/settings", None).await;
    assert_eq!(settings["settings"]["workoutTime"], 40);
}

#[tokio::test]
async fn unknown_api_path_is_json_404() {
    let app = test_app();
    let (status, body) = send_json(&app, Method::GET, "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("/api/nope"));
}

#[tokio::test]
async fn serves_index_and_assets() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());

    let (status, body) = send(&app, Method::GET, "/assets/app.js", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hiit')");
}

#[tokio::test]
async fn client_routes_fall_back_to_index() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/settings/advanced", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn missing_asset_is_404() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/assets/missing.js", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Read the event stream until `needle` shows up
async fn read_events_until(body: &mut axum::body::BodyDataStream, seen: &mut String, needle: &str) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !seen.contains(needle) {
            let chunk = body.next().await.unwrap().unwrap();
            seen.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn events_stream_state_then_cues() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();
    read_events_until(&mut body, &mut seen, "\n\n").await;
    assert!(seen.starts_with("event: state\n"), "first frame: {seen:?}");
    assert!(seen.contains(r#""phase":"prepare""#));

    send(&app, Method::POST, "/api/start", None).await;
    read_events_until(&mut body, &mut seen, r#""text":"Start""#).await;
    assert!(seen.contains("event: cue\n"));
    read_events_until(&mut body, &mut seen, r#""isRunning":true"#).await;
}

#[tokio::test]
async fn start_while_running_is_reported() {
    let app = test_app();
    send(&app, Method::POST, "/api/start", None).await;

    let (status, body) = send_json(&app, Method::POST, "/api/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Workout already running");
    assert_eq!(body["status"], "running");
}
