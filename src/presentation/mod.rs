//! Presentation layer
//!
//! The session controller never renders anything itself. It issues render
//! requests to a [`PresentationSink`]; the HTTP server uses [`ScreenSink`],
//! which keeps the screen a browser would currently show.

pub mod screen;

pub use screen::{OptionView, QuestionView, Screen, ScreenSink};

use crate::{
    quiz::{Question, Round},
    session::QuizOutcome,
    state::timer_state::Clock,
};

/// Render requests issued by the quiz
pub trait PresentationSink: Send {
    fn show_login_error(&mut self, message: &str);

    /// A round has started; `index` is zero-based
    fn show_round(&mut self, index: usize, round: &Round, clock: Clock);

    /// Question `index` (zero-based) of the current round
    fn show_question(&mut self, index: usize, question: &Question);

    fn show_timer(&mut self, clock: Clock);

    fn show_result(&mut self, outcome: &QuizOutcome);

    /// Blocking prompt, e.g. advancing without an option selected
    fn show_prompt(&mut self, message: &str);

    fn show_load_error(&mut self, message: &str);
}
