//! Quiz definition sources
//!
//! The session controller only ever sees a typed [`QuizDefinition`]. Where it
//! comes from is hidden behind [`QuizSource`]; the server reads an XML document
//! of the form:
//!
//! ```xml
//! <quiz>
//!   <round title="Aptitude" time="5" marks="10">
//!     <question>
//!       <text>2 + 2 = ?</text>
//!       <option>A. 3</option>
//!       <option>B. 4</option>
//!       <answer>B</answer>
//!     </question>
//!   </round>
//! </quiz>
//! ```
//!
//! `time` is given in minutes and `marks` must be a finite, non-negative
//! number. Rounds are read from the direct children of the root element;
//! other elements may sit between them.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::definition::{AnswerOption, Question, QuizDefinition, Round};

/// Errors raised while fetching or decoding a quiz definition
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read quiz definition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed quiz definition: {0}")]
    Parse(#[from] quick_xml::DeError),

    #[error("round {round} has invalid marks {marks}")]
    InvalidMarks { round: usize, marks: f64 },

    #[error("round {round} question {question} has a blank option")]
    BlankOption { round: usize, question: usize },

    #[error("round {round} question {question} has no options")]
    NoOptions { round: usize, question: usize },

    #[error("round {round} question {question} has no answer")]
    MissingAnswer { round: usize, question: usize },
}

/// Anything that can deliver a quiz definition
#[async_trait]
pub trait QuizSource: Send + Sync {
    async fn load(&self) -> Result<QuizDefinition, LoadError>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

/// Reads the definition from an XML file on every load
#[derive(Debug, Clone)]
pub struct XmlFileSource {
    path: PathBuf,
}

impl XmlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuizSource for XmlFileSource {
    async fn load(&self) -> Result<QuizDefinition, LoadError> {
        debug!("Reading quiz definition from {}", self.path.display());
        let document = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Read {
                path: self.path.clone(),
                source,
            })?;

        let definition = parse_quiz_xml(&document)?;
        info!(
            "Loaded {} rounds ({} marks) from {}",
            definition.round_count(),
            definition.total_marks(),
            self.path.display()
        );
        Ok(definition)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A definition held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    definition: QuizDefinition,
}

impl InMemorySource {
    pub fn new(definition: QuizDefinition) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl QuizSource for InMemorySource {
    async fn load(&self) -> Result<QuizDefinition, LoadError> {
        Ok(self.definition.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory quiz with {} rounds", self.definition.round_count())
    }
}

#[derive(Debug, Deserialize)]
struct XmlQuiz {
    #[serde(rename = "round", default)]
    rounds: Vec<XmlRound>,
}

#[derive(Debug, Deserialize)]
struct XmlRound {
    #[serde(rename = "@title")]
    title: String,
    /// Minutes
    #[serde(rename = "@time")]
    time: u64,
    #[serde(rename = "@marks")]
    marks: f64,
    #[serde(rename = "question", default)]
    questions: Vec<XmlQuestion>,
}

#[derive(Debug, Deserialize)]
struct XmlQuestion {
    text: String,
    #[serde(rename = "option", default)]
    options: Vec<String>,
    #[serde(default)]
    answer: String,
}

/// Decode an XML quiz document into a [`QuizDefinition`]
pub fn parse_quiz_xml(document: &str) -> Result<QuizDefinition, LoadError> {
    let quiz: XmlQuiz = quick_xml::de::from_str(document)?;

    let rounds = quiz
        .rounds
        .into_iter()
        .enumerate()
        .map(|(round_index, round)| convert_round(round_index, round))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuizDefinition::new(rounds))
}

fn convert_round(round_index: usize, round: XmlRound) -> Result<Round, LoadError> {
    if !round.marks.is_finite() || round.marks < 0.0 {
        return Err(LoadError::InvalidMarks {
            round: round_index + 1,
            marks: round.marks,
        });
    }

    let questions = round
        .questions
        .into_iter()
        .enumerate()
        .map(|(question_index, question)| {
            let location = (round_index + 1, question_index + 1);
            convert_question(location, question)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Round {
        title: round.title.trim().to_string(),
        time_limit_seconds: round.time.saturating_mul(60),
        marks: round.marks,
        questions,
    })
}

fn convert_question(
    (round, question): (usize, usize),
    raw: XmlQuestion,
) -> Result<Question, LoadError> {
    if raw.options.is_empty() {
        return Err(LoadError::NoOptions { round, question });
    }

    let options = raw
        .options
        .iter()
        .map(|label| AnswerOption::from_label(label).ok_or(LoadError::BlankOption { round, question }))
        .collect::<Result<Vec<_>, _>>()?;

    let correct_choice = raw.answer.trim().to_string();
    if correct_choice.is_empty() {
        return Err(LoadError::MissingAnswer { round, question });
    }

    Ok(Question {
        text: raw.text.trim().to_string(),
        options,
        correct_choice,
    })
}
