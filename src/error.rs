//! Umbrella error for operations on the shared quiz state

use thiserror::Error;

use crate::{auth::AuthError, quiz::LoadError, session::SessionError};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to lock quiz state: {0}")]
    Lock(String),
}
