//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{presentation::Screen, state::SessionSnapshot};

/// Body of POST /login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// Body of POST /next. `choice` is absent when nothing was selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub choice: Option<String>,
}

/// Response for endpoints that drive the quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub screen: Option<Screen>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, screen: Option<Screen>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            screen,
        }
    }

    pub fn ok(message: String, screen: Screen) -> Self {
        Self::new("ok", message, Some(screen))
    }

    /// Create an error response
    pub fn error(message: String, screen: Option<Screen>) -> Self {
        Self::new("error", message, screen)
    }
}

/// Status response with session and timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub timer_active: bool,
    pub timer_remaining_seconds: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
