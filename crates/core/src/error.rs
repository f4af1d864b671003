use thiserror::Error;

use crate::model::{AnswerError, QuestionError, SettingsError, TopicError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
