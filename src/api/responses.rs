//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Phase, Preset, PresetId, TimerState, Transition};

/// Digits of the countdown display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownDisplay {
    pub minutes: u64,
    pub seconds_tens: u64,
    pub seconds_units: u64,
    pub text: String,
}

/// Which controls the presentation surface should offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controls {
    pub preset_selection_enabled: bool,
    pub custom_inputs_visible: bool,
    /// "start" or "pause"
    pub primary_action: String,
    pub reset_enabled: bool,
}

/// Everything needed to render the timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub preset: PresetId,
    pub preset_name: String,
    pub description: String,
    pub phase: Phase,
    pub headline: String,
    pub remaining_seconds: u64,
    pub total_duration_seconds: u64,
    pub progress_fraction: f64,
    pub display: CountdownDisplay,
    pub custom_minutes: u64,
    pub custom_seconds: u64,
    pub quote: String,
    pub controls: Controls,
    pub overlay_visible: bool,
}

impl From<&TimerState> for TimerView {
    fn from(timer: &TimerState) -> Self {
        let preset = timer.selected().preset();
        let running = timer.is_running();

        Self {
            preset: preset.id,
            preset_name: preset.name.to_string(),
            description: preset.description.to_string(),
            phase: timer.phase(),
            headline: timer.headline().to_string(),
            remaining_seconds: timer.remaining_seconds(),
            total_duration_seconds: timer.total_duration_seconds(),
            progress_fraction: timer.progress_fraction(),
            display: CountdownDisplay {
                minutes: timer.minutes_display(),
                seconds_tens: timer.seconds_tens_digit(),
                seconds_units: timer.seconds_units_digit(),
                text: timer.display_text(),
            },
            custom_minutes: timer.custom_minutes(),
            custom_seconds: timer.custom_seconds(),
            quote: timer.current_quote().to_string(),
            controls: Controls {
                preset_selection_enabled: !running,
                custom_inputs_visible: preset.id.is_custom() && timer.phase() == Phase::Idle,
                primary_action: if running { "pause" } else { "start" }.to_string(),
                reset_enabled: true,
            },
            overlay_visible: timer.overlay_visible(),
        }
    }
}

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// "updated", "completed" or "unchanged"
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(transition: Transition, message: String, timer: &TimerState) -> Self {
        let status = match transition {
            Transition::Unchanged => "unchanged",
            Transition::Updated => "updated",
            Transition::Completed => "completed",
        };

        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: TimerView::from(timer),
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Preset listing entry
#[derive(Debug, Clone, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<&'static Preset>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
