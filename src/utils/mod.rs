//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod input;
pub mod signals;

// Re-export main functions
pub use input::{normalize_field, parse_lenient};
pub use signals::shutdown_signal;
