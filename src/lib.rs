//! Quiz Gate - A timed, multi-round admission quiz served over HTTP
//!
//! Users log in with an institutional email, then answer one question at a
//! time while each round's countdown runs. The final score is normalized to
//! ten points and mapped to an admission tier.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod presentation;
pub mod quiz;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::QuizError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
