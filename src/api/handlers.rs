//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    state::{AppState, PresetId, TimerState, Transition},
    utils::normalize_field,
};
use super::responses::{ApiResponse, HealthResponse, PresetsResponse, StatusResponse, TimerView};

/// Body of POST /custom. Fields may be numbers, strings or missing.
#[derive(Debug, Default, Deserialize)]
pub struct CustomDurationRequest {
    #[serde(default)]
    pub minutes: Value,
    #[serde(default)]
    pub seconds: Value,
}

/// Turn the outcome of an intent into a JSON response
fn respond(
    action: &str,
    result: Result<(Transition, TimerState), String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((transition, timer)) => {
            let message = if transition.is_applied() {
                format!("{} applied", action)
            } else {
                format!("{} ignored in phase {}", action, timer.phase().as_str())
            };
            Ok(Json(ApiResponse::new(transition, message, &timer)))
        }
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /presets - List the available fighters
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: PresetId::ALL.iter().map(|id| id.preset()).collect(),
    })
}

/// Handle POST /preset/:preset_id - Select a fighter
pub async fn select_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(preset_id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let id: PresetId = match preset_id.parse() {
        Ok(id) => id,
        Err(e) => {
            warn!("{}", e);
            return Err(StatusCode::NOT_FOUND);
        }
    };

    respond("select", state.select_preset(id))
}

/// Handle POST /custom - Edit the custom duration
pub async fn custom_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomDurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let minutes = normalize_field(&request.minutes);
    let seconds = normalize_field(&request.seconds);
    info!("Custom duration endpoint called - {}m {}s", minutes, seconds);
    respond("custom", state.set_custom_duration(minutes, seconds))
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("start", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", state.pause())
}

/// Handle POST /toggle - The start/pause button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("toggle", state.toggle())
}

/// Handle POST /reset - Reload the full duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("reset", state.reset())
}

/// Handle POST /dismiss - Close the completion overlay
pub async fn dismiss_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("dismiss", state.dismiss_completion())
}

/// Handle GET /status - Return the current view of the timer
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer_state = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerView::from(&timer_state),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Encode one server-sent event frame
fn sse_frame<T: Serialize>(name: &str, data: &T) -> Option<Event> {
    match Event::default().event(name).json_data(data) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!("Failed to encode {} frame: {}", name, e);
            None
        }
    }
}

/// Handle GET /events - Stream timer events and snapshots as server-sent events.
///
/// The first frame is the current snapshot; after that every change to the
/// timer produces a `snapshot` frame and every `TimerEvent` its own frame.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");
    let events = state.subscribe_events();
    let mut snapshots = state.subscribe_snapshots();
    let initial = snapshots.borrow_and_update().clone();

    let stream = stream::unfold(
        (events, snapshots, Some(initial)),
        |(mut events, mut snapshots, initial)| async move {
            if let Some(frame) = initial.and_then(|timer| sse_frame("snapshot", &TimerView::from(&timer))) {
                return Some((Ok::<_, Infallible>(frame), (events, snapshots, None)));
            }

            loop {
                tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) => {
                            if let Some(frame) = sse_frame(event.name(), &event) {
                                return Some((Ok(frame), (events, snapshots, None)));
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Event stream lagged, skipped {} events", skipped);
                        }
                        Err(RecvError::Closed) => return None,
                    },

                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            return None;
                        }
                        let timer = snapshots.borrow_and_update().clone();
                        if let Some(frame) = sse_frame("snapshot", &TimerView::from(&timer)) {
                            return Some((Ok(frame), (events, snapshots, None)));
                        }
                    }
                }
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
