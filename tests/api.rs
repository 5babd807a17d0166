use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body, BodyDataStream},
    http::{header, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use egg_o_matic::{create_router, state::PresetId, AppState, TimerState};

fn app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), TimerState::new()));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_status_reports_initial_view() {
    let (_, router) = app();
    let (status, body) = call(&router, "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["preset"], "soft");
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 180);
    assert_eq!(body["timer"]["display"]["text"], "3:00");
    assert_eq!(body["timer"]["headline"], "READY TO RUMBLE");
    assert_eq!(body["timer"]["controls"]["primary_action"], "start");
    assert_eq!(body["timer"]["controls"]["custom_inputs_visible"], false);
}

#[tokio::test]
async fn test_presets_listing() {
    let (_, router) = app();
    let (status, body) = call(&router, "GET", "/presets", None).await;

    assert_eq!(status, StatusCode::OK);
    let presets = body["presets"].as_array().unwrap();
    assert_eq!(presets.len(), 4);
    assert_eq!(presets[0]["name"], "The Softie");
    assert_eq!(presets[3]["id"], "custom");
}

#[tokio::test]
async fn test_custom_flow_with_sloppy_input() {
    let (_, router) = app();

    let (_, body) = call(&router, "POST", "/preset/custom", None).await;
    assert_eq!(body["status"], "updated");
    assert_eq!(body["timer"]["controls"]["custom_inputs_visible"], true);

    let (status, body) = call(
        &router,
        "POST",
        "/custom",
        Some(json!({ "minutes": "2", "seconds": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 150);

    let (_, body) = call(
        &router,
        "POST",
        "/custom",
        Some(json!({ "minutes": "abc", "seconds": 99 })),
    )
    .await;
    assert_eq!(body["timer"]["custom_minutes"], 0);
    assert_eq!(body["timer"]["custom_seconds"], 59);
    assert_eq!(body["timer"]["remaining_seconds"], 59);
}

#[tokio::test]
async fn test_select_rejected_while_running() {
    let (state, router) = app();

    let (_, body) = call(&router, "POST", "/start", None).await;
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["timer"]["controls"]["preset_selection_enabled"], false);

    let (status, body) = call(&router, "POST", "/preset/hard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["timer"]["preset"], "soft");
    assert_eq!(state.get_timer_state().unwrap().selected(), PresetId::Soft);
}

#[tokio::test]
async fn test_unknown_preset_is_not_found() {
    let (_, router) = app();
    let (status, _) = call(&router, "POST", "/preset/poached", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_completion_overlay_and_dismiss() {
    let (state, router) = app();
    call(&router, "POST", "/preset/custom", None).await;
    call(&router, "POST", "/custom", Some(json!({ "minutes": 0, "seconds": 1 }))).await;

    let (_, body) = call(&router, "POST", "/toggle", None).await;
    assert_eq!(body["timer"]["controls"]["primary_action"], "pause");

    let generation = state.get_timer_state().unwrap().run_generation();
    state.tick(generation).unwrap();

    let (_, body) = call(&router, "GET", "/status", None).await;
    assert_eq!(body["timer"]["phase"], "finished");
    assert_eq!(body["timer"]["overlay_visible"], true);
    assert_eq!(body["timer"]["headline"], "READY!");
    assert_eq!(body["timer"]["progress_fraction"], 1.0);

    let (_, body) = call(&router, "POST", "/dismiss", None).await;
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["overlay_visible"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 1);
    assert_eq!(body["timer"]["progress_fraction"], 0.0);
}

#[tokio::test]
async fn test_health() {
    let (_, router) = app();
    let (status, body) = call(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

async fn read_until(body: &mut BodyDataStream, needle: &str) -> String {
    let mut seen = String::new();
    while !seen.contains(needle) {
        let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("event stream stalled")
            .expect("event stream ended")
            .unwrap();
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
    seen
}

#[tokio::test]
async fn test_event_stream_reports_selection_and_completion() {
    let (state, router) = app();

    let response = router
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    let mut body = response.into_body().into_data_stream();

    let seen = read_until(&mut body, "\"remaining_seconds\":180").await;
    assert!(seen.contains("snapshot"));

    state.select_preset(PresetId::Hard).unwrap();
    let seen = read_until(&mut body, "\"event\":\"preset_selected\"").await;
    assert!(seen.contains("\"preset\":\"hard\""));

    state.select_preset(PresetId::Custom).unwrap();
    state.set_custom_duration(0, 1).unwrap();
    let (_, snapshot) = state.start().unwrap();
    state.tick(snapshot.run_generation()).unwrap();

    let seen = read_until(&mut body, "\"event\":\"completed\"").await;
    assert!(seen.contains("\"preset\":\"custom\""));
}
