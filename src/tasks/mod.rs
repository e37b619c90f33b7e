//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod round_timer;

// Re-export main functions
pub use round_timer::{round_timer_task, TICK_PERIOD};
