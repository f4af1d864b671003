use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::model::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question index {index} is out of range ({len} questions)")]
    InvalidIndex { index: usize, len: usize },

    #[error("option {option} is out of range for question {index} ({options} options)")]
    InvalidOption {
        index: usize,
        option: usize,
        options: usize,
    },
}

/// Chosen option per question index.
///
/// Keys are unique; re-answering a question replaces the stored choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSheet {
    choices: BTreeMap<usize, usize>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `option` as the answer to `questions[index]`.
    ///
    /// Returns the previously stored choice, if any.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidIndex` if `index` is not an existing question,
    /// or `AnswerError::InvalidOption` if the question has no such option.
    pub fn record(
        &mut self,
        questions: &[Question],
        index: usize,
        option: usize,
    ) -> Result<Option<usize>, AnswerError> {
        let question = questions.get(index).ok_or(AnswerError::InvalidIndex {
            index,
            len: questions.len(),
        })?;
        let options = question.options().len();
        if option >= options {
            return Err(AnswerError::InvalidOption {
                index,
                option,
                options,
            });
        }
        Ok(self.choices.insert(index, option))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.choices.get(&index).copied()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.choices.contains_key(&index)
    }

    /// Number of questions with a stored answer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// `(question index, chosen option)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.choices.iter().map(|(q, o)| (*q, *o))
    }
}
