//! State management module
//!
//! Shared application state and the round countdown it publishes.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, QuizRuntime, SessionSnapshot};
pub use timer_state::{Clock, Tick, TimerState};
