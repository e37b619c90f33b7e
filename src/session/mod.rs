//! Quiz session module
//!
//! The round/question state machine and the scoring applied when it ends.

pub mod controller;
pub mod error;
pub mod scoring;

pub use controller::{AnswerOutcome, Phase, QuizSession, SessionState};
pub use error::{SessionError, NO_SELECTION_MESSAGE};
pub use scoring::{normalize, AdmissionTier, QuizOutcome};
