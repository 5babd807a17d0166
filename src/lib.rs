//! Egg-O-Matic - An egg cooking battle timer served over HTTP
//!
//! This library provides the countdown controller, its presets and the
//! background tasks and HTTP surface that drive it.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
