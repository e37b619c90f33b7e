//! Quiz definition module
//!
//! Typed rounds and questions, and the sources that produce them.

pub mod definition;
pub mod source;

pub use definition::{AnswerOption, Question, QuizDefinition, Round};
pub use source::{parse_quiz_xml, InMemorySource, LoadError, QuizSource, XmlFileSource};
