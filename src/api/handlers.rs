//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::QuizError,
    presentation::Screen,
    session::SessionError,
    state::AppState,
};
use super::responses::{AnswerRequest, ApiResponse, HealthResponse, LoginRequest, StatusResponse};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Status code for a refused quiz operation
pub fn status_for(err: &QuizError) -> StatusCode {
    match err {
        QuizError::Auth(_) => StatusCode::UNAUTHORIZED,
        QuizError::Load(_) => StatusCode::SERVICE_UNAVAILABLE,
        QuizError::Session(SessionError::NoSelection) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizError::Session(SessionError::UnknownChoice(_)) => StatusCode::BAD_REQUEST,
        QuizError::Session(SessionError::NotActive | SessionError::AlreadyLoaded) => StatusCode::CONFLICT,
        QuizError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the error reply, attaching whatever the user is looking at now
fn failure(state: &AppState, err: QuizError) -> (StatusCode, Json<ApiResponse>) {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Quiz operation failed: {}", err);
    }
    (status, Json(ApiResponse::error(err.to_string(), state.screen().ok())))
}

/// Handle POST /login - Check the email and start the quiz
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult {
    match state.login(&request.email).await {
        Ok(screen) => {
            info!("Login endpoint called - quiz in progress");
            Ok(Json(ApiResponse::ok("Login accepted".to_string(), screen)))
        }
        Err(e) => {
            warn!("Login refused: {}", e);
            Err(failure(&state, e))
        }
    }
}

/// Handle POST /next - Submit the selected choice and advance
pub async fn next_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> ApiResult {
    let choice = request
        .choice
        .as_deref()
        .map(str::trim)
        .filter(|choice| !choice.is_empty());

    match state.submit_answer(choice) {
        Ok((outcome, screen)) => {
            debug!("Next endpoint called - answer credited {}", outcome.credit);
            let message = match screen {
                Screen::Result { .. } => "Quiz complete",
                _ => "Answer recorded",
            };
            Ok(Json(ApiResponse::ok(message.to_string(), screen)))
        }
        Err(e) => {
            debug!("Answer refused: {}", e);
            Err(failure(&state, e))
        }
    }
}

/// Handle GET /quiz - Return the current screen
pub async fn quiz_handler(State(state): State<Arc<AppState>>) -> Result<Json<Screen>, StatusCode> {
    state.screen().map(Json).map_err(|e| {
        error!("Failed to get screen: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Return session, timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let session = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get session state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer_active: session.state.timer.is_active(),
        timer_remaining_seconds: session.state.remaining_seconds(),
        session,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
