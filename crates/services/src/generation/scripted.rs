use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use assess_core::model::{AssessmentTopic, DifficultyLevel, OPTION_COUNT, Question, QuestionError};

use super::QuestionGenerator;
use crate::error::GenerationError;

type Reply = Result<Vec<Question>, GenerationError>;

/// In-memory question generator for tests and offline runs.
///
/// Queued replies are returned first, in order. Once the queue is empty every
/// request is answered with placeholder questions matching the requested mix.
/// Every request's mix is recorded.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Vec<DifficultyLevel>>>>,
    produced: Arc<Mutex<usize>>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next unanswered request.
    pub fn push_reply(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Mixes of every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<DifficultyLevel>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Placeholder question whose correct option is `serial % 4`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` only if `topic` and the generated
    /// label are blank, which cannot happen for a validated topic.
    pub fn placeholder(
        serial: usize,
        difficulty: DifficultyLevel,
        topic: &str,
    ) -> Result<Question, QuestionError> {
        let options = (0..OPTION_COUNT)
            .map(|o| format!("Option {}", char::from(b'A' + o as u8)))
            .collect();
        Question::new(
            format!("{topic} question {} ({difficulty})", serial + 1),
            options,
            serial % OPTION_COUNT,
            difficulty,
        )
    }
}

#[async_trait]
impl QuestionGenerator for ScriptedGenerator {
    async fn generate_questions(
        &self,
        topic: &AssessmentTopic,
        mix: &[DifficultyLevel],
    ) -> Result<Vec<Question>, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(mix.to_vec());
        }

        let queued = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        if let Some(reply) = queued {
            return reply;
        }

        let mut produced = self.produced.lock().map_err(|_| GenerationError::EmptyResponse)?;
        let label = topic.describe();
        mix.iter()
            .enumerate()
            .map(|(index, level)| {
                let question = Self::placeholder(*produced, *level, &label)
                    .map_err(|source| GenerationError::InvalidQuestion { index, source })?;
                *produced += 1;
                Ok::<_, GenerationError>(question)
            })
            .collect()
    }
}
