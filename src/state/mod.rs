//! State management module
//!
//! This module contains the countdown controller, the preset table and the
//! shared application state that publishes changes to the rest of the app.

pub mod preset;
pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use preset::{Preset, PresetId, PRESETS};
pub use app_state::{AppState, RunSignal, TimerEvent};
pub use timer_state::{Phase, TimerState, Transition};
