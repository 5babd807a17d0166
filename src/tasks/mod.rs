//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod completion_alert;
pub mod countdown;
pub mod quote_rotation;

// Re-export main functions
pub use completion_alert::completion_alert_task;
pub use countdown::countdown_task;
pub use quote_rotation::quote_rotation_task;
