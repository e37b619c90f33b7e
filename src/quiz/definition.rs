//! Typed quiz definition: rounds, questions and answer options

use serde::{Deserialize, Serialize};

/// A complete quiz, rounds in presentation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizDefinition {
    pub rounds: Vec<Round>,
}

impl QuizDefinition {
    pub fn new(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    /// Sum of every round's marks
    pub fn total_marks(&self) -> f64 {
        self.rounds.iter().map(|round| round.marks).sum()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

/// A timed group of questions sharing one pool of marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub title: String,
    pub time_limit_seconds: u64,
    pub marks: f64,
    pub questions: Vec<Question>,
}

impl Round {
    /// Marks awarded for each correctly answered question.
    ///
    /// `None` when the round has no questions.
    pub fn per_question_credit(&self) -> Option<f64> {
        if self.questions.is_empty() {
            None
        } else {
            Some(self.marks / self.questions.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub correct_choice: String,
}

impl Question {
    /// Whether `choice` names one of this question's options
    pub fn offers(&self, choice: &str) -> bool {
        self.options.iter().any(|option| option.choice == choice)
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_choice == choice
    }
}

/// One selectable option. `choice` is the leading character of `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub choice: String,
    pub label: String,
}

impl AnswerOption {
    /// Build an option from its displayed label, e.g. `"A. Paris"`.
    ///
    /// Returns `None` when the label is blank.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let choice = label.chars().next()?;
        Some(Self {
            choice: choice.to_string(),
            label: label.to_string(),
        })
    }
}
