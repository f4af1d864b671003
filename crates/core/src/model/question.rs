use serde::Serialize;
use thiserror::Error;

use crate::model::DifficultyLevel;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option index {index} is out of range")]
    CorrectIndexOutOfRange { index: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as produced by the generation collaborator.
///
/// Immutable once built: a session only ever appends questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_option: usize,
    difficulty: DifficultyLevel,
}

impl Question {
    /// Build a validated question.
    ///
    /// Text and options are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, the option count
    /// is not [`OPTION_COUNT`], or `correct_option` does not point at an option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
        difficulty: DifficultyLevel,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let len = options.len();
        let options: Vec<String> = options.into_iter().map(|o| o.trim().to_owned()).collect();
        if let Some(index) = options.iter().position(String::is_empty) {
            return Err(QuestionError::EmptyOption { index });
        }
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuestionError::WrongOptionCount { len })?;

        if correct_option >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_option,
            });
        }

        Ok(Self {
            text,
            options,
            correct_option,
            difficulty,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option]
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn builds_trimmed_question() {
        let q = Question::new(
            "  What is 2 + 2?  ",
            opts(&["3", " 4 ", "5", "22"]),
            1,
            DifficultyLevel::Easy,
        )
        .unwrap();

        assert_eq!(q.text(), "What is 2 + 2?");
        assert_eq!(q.option(1), Some("4"));
        assert_eq!(q.correct_text(), "4");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert_eq!(q.option(4), None);
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new("   ", opts(&["a", "b", "c", "d"]), 0, DifficultyLevel::Easy)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err =
            Question::new("Q", opts(&["a", "b", "c"]), 0, DifficultyLevel::Hard).unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount { len: 3 });
    }

    #[test]
    fn rejects_blank_option() {
        let err = Question::new("Q", opts(&["a", " ", "c", "d"]), 0, DifficultyLevel::Medium)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new("Q", opts(&["a", "b", "c", "d"]), 4, DifficultyLevel::Medium)
            .unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 4 });
    }
}
