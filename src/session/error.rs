use thiserror::Error;

/// Prompt shown when advancing without a selection
pub const NO_SELECTION_MESSAGE: &str = "Please select an option.";

/// Transitions the session refused. None of them change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please select an option.")]
    NoSelection,

    #[error("choice {0:?} is not an option of the current question")]
    UnknownChoice(String),

    #[error("no round is in progress")]
    NotActive,

    #[error("quiz has already been loaded")]
    AlreadyLoaded,
}
