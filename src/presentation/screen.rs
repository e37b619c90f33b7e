//! Serializable screen model

use serde::{Deserialize, Serialize};

use super::PresentationSink;
use crate::{
    quiz::{Question, Round},
    session::{AdmissionTier, QuizOutcome},
    state::timer_state::Clock,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub choice: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    /// One-based position within the round
    pub number: usize,
    pub text: String,
    pub options: Vec<OptionView>,
}

/// What the user currently sees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Screen {
    Login {
        error: Option<String>,
    },
    Round {
        round_index: usize,
        title: String,
        timer: String,
        question: Option<QuestionView>,
        notice: Option<String>,
    },
    Result {
        score: String,
        admission: String,
        normalized_score: f64,
        tier: AdmissionTier,
    },
    Unavailable {
        message: String,
    },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Login { error: None }
    }
}

/// Sink that keeps the latest [`Screen`]
#[derive(Debug, Default)]
pub struct ScreenSink {
    screen: Screen,
}

impl ScreenSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }
}

impl PresentationSink for ScreenSink {
    fn show_login_error(&mut self, message: &str) {
        self.screen = Screen::Login {
            error: Some(message.to_string()),
        };
    }

    fn show_round(&mut self, index: usize, round: &Round, clock: Clock) {
        self.screen = Screen::Round {
            round_index: index,
            title: round.title.clone(),
            timer: clock.to_string(),
            question: None,
            notice: None,
        };
    }

    fn show_question(&mut self, index: usize, question: &Question) {
        if let Screen::Round {
            question: shown,
            notice,
            ..
        } = &mut self.screen
        {
            *shown = Some(QuestionView {
                number: index + 1,
                text: question.text.clone(),
                options: question
                    .options
                    .iter()
                    .map(|option| OptionView {
                        choice: option.choice.clone(),
                        label: option.label.clone(),
                    })
                    .collect(),
            });
            *notice = None;
        }
    }

    fn show_timer(&mut self, clock: Clock) {
        if let Screen::Round { timer, .. } = &mut self.screen {
            *timer = clock.to_string();
        }
    }

    fn show_result(&mut self, outcome: &QuizOutcome) {
        self.screen = Screen::Result {
            score: outcome.score_line(),
            admission: outcome.admission_line(),
            normalized_score: outcome.normalized_score,
            tier: outcome.tier,
        };
    }

    fn show_prompt(&mut self, message: &str) {
        if let Screen::Round { notice, .. } = &mut self.screen {
            *notice = Some(message.to_string());
        }
    }

    fn show_load_error(&mut self, message: &str) {
        self.screen = Screen::Unavailable {
            message: message.to_string(),
        };
    }
}
