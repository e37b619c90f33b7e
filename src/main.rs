//! Quiz Gate - A timed, multi-round admission quiz served over HTTP
//!
//! This is the main entry point for the quiz-gate application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use quiz_gate::{
    api::create_router,
    config::Config,
    quiz::XmlFileSource,
    state::AppState,
    tasks::round_timer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("quiz_gate={},tower_http=info", config.log_level()))
        .init();

    info!("Starting quiz-gate server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, quiz={}",
          config.host, config.port, config.quiz.display());

    // Create application state
    let source = Arc::new(XmlFileSource::new(&config.quiz));
    let state = Arc::new(AppState::new(config.port, config.host.clone(), source));

    // A broken definition is reported to users at login, not fatal here
    if let Err(e) = state.preflight().await {
        warn!("Quiz definition is not usable yet: {}", e);
    }

    // Start the round countdown background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        round_timer_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /login  - Submit email and start the quiz");
    info!("  POST /next   - Submit the selected choice and advance");
    info!("  GET  /quiz   - Current screen");
    info!("  GET  /status - Session, timer and server status");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
