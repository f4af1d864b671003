//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::{AnswerError, QuestionError, TopicError};

/// Errors emitted while asking the generation collaborator for questions.
///
/// All variants are recoverable by retrying; the session is left untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("question generation is not configured")]
    Disabled,
    #[error("invalid generator base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("generation returned an empty response")]
    EmptyResponse,
    #[error("generation response contains no JSON array")]
    MissingJsonArray,
    #[error("generation response is not valid question JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected {expected} questions, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("generated question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by assessment sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session has already been started")]
    AlreadyStarted,
    #[error("a question request is still pending for this session")]
    GenerationPending,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Topic(#[from] TopicError),
}
