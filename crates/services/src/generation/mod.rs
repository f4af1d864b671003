mod chat;
mod parse;
mod prompt;
mod scripted;

use async_trait::async_trait;

use assess_core::model::{AssessmentTopic, DifficultyLevel, Question};

use crate::error::GenerationError;

pub use chat::{ChatQuestionGenerator, GeneratorConfig};
pub use parse::parse_questions;
pub use prompt::build_prompt;
pub use scripted::ScriptedGenerator;

/// The external capability that writes question content.
///
/// `mix` lists the requested difficulty of each question, in order; an
/// implementation must return exactly `mix.len()` questions or an error.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produce one question per entry in `mix`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when no usable batch could be produced.
    async fn generate_questions(
        &self,
        topic: &AssessmentTopic,
        mix: &[DifficultyLevel],
    ) -> Result<Vec<Question>, GenerationError>;
}
