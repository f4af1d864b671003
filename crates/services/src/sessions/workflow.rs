use std::sync::Arc;

use assess_core::model::{AssessmentSettings, AssessmentTopic, DifficultyLevel};

use super::service::{AdvanceStep, AssessmentSession};
use super::submission::Submission;
use crate::Clock;
use crate::error::SessionError;
use crate::generation::QuestionGenerator;

/// Result of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Stepped onto a question that was already available.
    Moved { cursor: usize },
    /// A new question was generated, appended, and is now current.
    Extended {
        cursor: usize,
        difficulty: DifficultyLevel,
    },
    /// The session holds its maximum number of questions; nothing changed.
    AtCapacity,
}

/// Orchestrates assessment sessions against the generation collaborator.
#[derive(Clone)]
pub struct AssessmentLoopService {
    clock: Clock,
    generator: Arc<dyn QuestionGenerator>,
    settings: AssessmentSettings,
}

impl AssessmentLoopService {
    #[must_use]
    pub fn new(clock: Clock, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            clock,
            generator,
            settings: AssessmentSettings::standard(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: AssessmentSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &AssessmentSettings {
        &self.settings
    }

    /// Create an idle session for `topic` using this service's settings.
    #[must_use]
    pub fn new_session(&self, topic: AssessmentTopic) -> AssessmentSession {
        AssessmentSession::new(topic, self.settings.clone())
    }

    /// Create a session and fill it with the opening batch.
    ///
    /// No session is returned unless the full batch arrived.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generation` if the collaborator fails or returns
    /// a batch of the wrong size.
    pub async fn start_session(
        &self,
        topic: AssessmentTopic,
    ) -> Result<AssessmentSession, SessionError> {
        let mut session = self.new_session(topic);
        self.start(&mut session).await?;
        Ok(session)
    }

    /// Request the opening batch for an idle session.
    ///
    /// On failure the session is back to idle and may be started again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` or `SessionError::GenerationPending`
    /// if the session is not idle, and `SessionError::Generation` if the
    /// collaborator fails or returns a batch of the wrong size.
    pub async fn start(&self, session: &mut AssessmentSession) -> Result<usize, SessionError> {
        let mix = session.begin_start()?;
        let reply = self
            .generator
            .generate_questions(session.topic(), &mix)
            .await;

        let questions = match reply {
            Ok(questions) => questions,
            Err(err) => {
                session.cancel_pending();
                log::warn!("session {}: opening batch failed: {err}", session.id());
                return Err(err.into());
            }
        };

        let count = session
            .finish_start(questions, self.clock.now())
            .inspect_err(|err| {
                log::warn!("session {}: opening batch rejected: {err}", session.id());
            })?;
        log::info!(
            "session {}: started on \"{}\" with {count} questions",
            session.id(),
            session.topic().describe()
        );
        Ok(count)
    }

    /// Move to the next question, generating it first when needed.
    ///
    /// While the request is outstanding the session is in
    /// [`SessionPhase::PendingGeneration`](super::SessionPhase::PendingGeneration).
    /// On failure the cursor stays where it was and the call may be retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before the opening batch,
    /// `SessionError::GenerationPending` if a request is still outstanding, and
    /// `SessionError::Generation` if the collaborator fails.
    pub async fn advance(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<AdvanceOutcome, SessionError> {
        let difficulty = match session.begin_advance()? {
            AdvanceStep::Moved(cursor) => return Ok(AdvanceOutcome::Moved { cursor }),
            AdvanceStep::AtCapacity => return Ok(AdvanceOutcome::AtCapacity),
            AdvanceStep::Extend(difficulty) => difficulty,
        };

        let mix = [difficulty];
        let reply = self
            .generator
            .generate_questions(session.topic(), &mix)
            .await;

        let questions = match reply {
            Ok(questions) => questions,
            Err(err) => {
                session.cancel_pending();
                log::warn!(
                    "session {}: question {} ({difficulty}) failed: {err}",
                    session.id(),
                    session.questions().len() + 1
                );
                return Err(err.into());
            }
        };

        let cursor = session.finish_extension(questions).inspect_err(|err| {
            log::warn!("session {}: extension rejected: {err}", session.id());
        })?;
        log::info!(
            "session {}: added question {} at {difficulty}",
            session.id(),
            cursor + 1
        );
        Ok(AdvanceOutcome::Extended { cursor, difficulty })
    }

    /// Score and review the session, consuming it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `SessionError::GenerationPending`
    /// if the session cannot be handed in.
    pub fn submit(&self, session: AssessmentSession) -> Result<Submission, SessionError> {
        let id = session.id();
        let submission = session.submit(self.clock.now())?;
        log::info!(
            "session {id}: submitted {}/{} correct ({}%, {})",
            submission.score.correct_count,
            submission.score.total_questions,
            submission.score.percentage,
            submission.grade
        );
        Ok(submission)
    }
}
