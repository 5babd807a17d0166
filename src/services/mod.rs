//! External service module
//!
//! This module contains the side effects the timer triggers outside the
//! process, currently the completion alert.

pub mod alert;

// Re-export main functions
pub use alert::*;
