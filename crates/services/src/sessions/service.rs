use chrono::{DateTime, Utc};
use std::fmt;

use assess_core::model::{
    AnswerSheet, AssessmentSettings, AssessmentTopic, DifficultyLevel, Question, ReviewEntry,
    SessionId, build_review,
};
use assess_core::{DifficultyController, ScoreResult};

use super::progress::SessionProgress;
use super::submission::Submission;
use crate::error::{GenerationError, SessionError};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a session stands with respect to the generation collaborator.
///
/// `PendingGeneration` is the single-flight guard: while it is set, neither
/// `start` nor `advance` may issue another request for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, no questions yet.
    Idle,
    /// A question request is outstanding.
    PendingGeneration,
    /// Questions are available and navigation is allowed.
    Ready,
}

/// What `advance` has to do next, decided synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdvanceStep {
    Moved(usize),
    AtCapacity,
    Extend(DifficultyLevel),
}

/// Outcome of storing one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecorded {
    pub index: usize,
    pub previous: Option<usize>,
    pub is_correct: bool,
    /// Whether this answer was fed to the difficulty controller.
    pub adapted: bool,
    pub difficulty: DifficultyLevel,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one adaptive assessment run.
///
/// Holds the append-only question list, the cursor, recorded answers and the
/// difficulty controller. Calls to the generation collaborator are made by
/// [`AssessmentLoopService`](super::AssessmentLoopService); the session only
/// decides when one is needed and applies the result all-or-nothing.
///
/// Adaptation is forward-only: an answer reaches the controller only when it is
/// the first answer for the question at the furthest position reached so far.
/// Going back and re-answering replaces the stored choice without touching the
/// streaks or the difficulty.
pub struct AssessmentSession {
    id: SessionId,
    topic: AssessmentTopic,
    settings: AssessmentSettings,
    questions: Vec<Question>,
    answers: AnswerSheet,
    cursor: usize,
    frontier: usize,
    controller: DifficultyController,
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
}

impl AssessmentSession {
    /// Create an empty session. It holds no questions until started.
    #[must_use]
    pub fn new(topic: AssessmentTopic, settings: AssessmentSettings) -> Self {
        let controller = DifficultyController::from_settings(&settings);
        Self {
            id: SessionId::new_random(),
            topic,
            settings,
            questions: Vec::new(),
            answers: AnswerSheet::new(),
            cursor: 0,
            frontier: 0,
            controller,
            phase: SessionPhase::Idle,
            started_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &AssessmentTopic {
        &self.topic
    }

    #[must_use]
    pub fn settings(&self) -> &AssessmentSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.phase == SessionPhase::PendingGeneration
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Difficulty the next generated question will be requested at.
    #[must_use]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.controller.difficulty()
    }

    #[must_use]
    pub fn controller(&self) -> &DifficultyController {
        &self.controller
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let available = self.questions.len();
        let max_length = self.settings.max_length();
        let ready = self.phase == SessionPhase::Ready;
        SessionProgress {
            cursor: self.cursor,
            available,
            max_length,
            answered: self.answers.len(),
            can_go_back: self.cursor > 0,
            can_advance: ready && (self.cursor + 1 < available || available < max_length),
            at_capacity: available >= max_length,
            pending: self.is_pending(),
        }
    }

    //
    // ─── GENERATION HANDSHAKE ──────────────────────────────────────────────────
    //

    /// Claim the single generation slot for the opening batch.
    pub(crate) fn begin_start(&mut self) -> Result<Vec<DifficultyLevel>, SessionError> {
        match self.phase {
            SessionPhase::Idle => {
                self.phase = SessionPhase::PendingGeneration;
                Ok(self.settings.initial_mix().levels())
            }
            SessionPhase::PendingGeneration => Err(SessionError::GenerationPending),
            SessionPhase::Ready => Err(SessionError::AlreadyStarted),
        }
    }

    /// Install the opening batch. A batch of the wrong size is discarded whole.
    pub(crate) fn finish_start(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<usize, SessionError> {
        if self.phase != SessionPhase::PendingGeneration || !self.questions.is_empty() {
            return Err(SessionError::AlreadyStarted);
        }
        let expected = self.settings.initial_batch_size();
        if questions.len() != expected {
            self.phase = SessionPhase::Idle;
            return Err(GenerationError::WrongCount {
                expected,
                actual: questions.len(),
            }
            .into());
        }

        self.questions = questions;
        self.cursor = 0;
        self.frontier = 0;
        self.started_at = Some(started_at);
        self.phase = SessionPhase::Ready;
        Ok(self.questions.len())
    }

    /// Move forward, or claim the generation slot if a new question is needed.
    pub(crate) fn begin_advance(&mut self) -> Result<AdvanceStep, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::PendingGeneration => return Err(SessionError::GenerationPending),
            SessionPhase::Ready => {}
        }

        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            self.frontier = self.frontier.max(self.cursor);
            return Ok(AdvanceStep::Moved(self.cursor));
        }
        if self.questions.len() >= self.settings.max_length() {
            return Ok(AdvanceStep::AtCapacity);
        }

        self.phase = SessionPhase::PendingGeneration;
        Ok(AdvanceStep::Extend(self.controller.difficulty()))
    }

    /// Append the requested question and step onto it.
    pub(crate) fn finish_extension(
        &mut self,
        questions: Vec<Question>,
    ) -> Result<usize, SessionError> {
        if self.phase != SessionPhase::PendingGeneration || self.questions.is_empty() {
            return Err(SessionError::NotStarted);
        }
        let actual = questions.len();
        let Ok([question]) = <[Question; 1]>::try_from(questions) else {
            self.phase = SessionPhase::Ready;
            return Err(GenerationError::WrongCount {
                expected: 1,
                actual,
            }
            .into());
        };

        self.questions.push(question);
        self.cursor = self.questions.len() - 1;
        self.frontier = self.cursor;
        self.phase = SessionPhase::Ready;
        Ok(self.cursor)
    }

    /// Release the generation slot after a failed request; nothing is applied.
    pub(crate) fn cancel_pending(&mut self) {
        if self.phase == SessionPhase::PendingGeneration {
            self.phase = if self.questions.is_empty() {
                SessionPhase::Idle
            } else {
                SessionPhase::Ready
            };
        }
    }

    //
    // ─── NAVIGATION & ANSWERS ──────────────────────────────────────────────────
    //

    /// Step back one question. Never triggers generation.
    pub fn go_back(&mut self) -> usize {
        self.cursor = self.cursor.saturating_sub(1);
        self.cursor
    }

    /// Store `option` as the answer to question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Answer` if `index` is not an existing question or
    /// `option` is not one of its options.
    pub fn record_answer(
        &mut self,
        index: usize,
        option: usize,
    ) -> Result<AnswerRecorded, SessionError> {
        let previous = self.answers.record(&self.questions, index, option)?;
        let is_correct = self.questions[index].is_correct(option);

        let adapted = previous.is_none() && index == self.frontier;
        if adapted {
            let before = self.controller.difficulty();
            let after = self.controller.record_outcome(is_correct);
            if before != after {
                log::debug!("session {}: difficulty {before} -> {after}", self.id);
            }
        }

        Ok(AnswerRecorded {
            index,
            previous,
            is_correct,
            adapted,
            difficulty: self.controller.difficulty(),
        })
    }

    /// Answer the question under the cursor.
    ///
    /// # Errors
    ///
    /// See [`record_answer`](Self::record_answer).
    pub fn answer_current(&mut self, option: usize) -> Result<AnswerRecorded, SessionError> {
        self.record_answer(self.cursor, option)
    }

    //
    // ─── RESULTS ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn score(&self) -> ScoreResult {
        ScoreResult::compute(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewEntry> {
        build_review(&self.questions, &self.answers)
    }

    /// Hand the session in, consuming it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` for a session without questions and
    /// `SessionError::GenerationPending` while a request is outstanding.
    pub fn submit(self, submitted_at: DateTime<Utc>) -> Result<Submission, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::PendingGeneration => return Err(SessionError::GenerationPending),
            SessionPhase::Ready => {}
        }
        let started_at = self.started_at.ok_or(SessionError::NotStarted)?;
        let score = self.score();
        let review = self.review();

        Ok(Submission {
            session_id: self.id,
            final_difficulty: self.controller.difficulty(),
            grade: score.grade(),
            score,
            review,
            topic: self.topic,
            started_at,
            submitted_at,
        })
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("cursor", &self.cursor)
            .field("difficulty", &self.controller.difficulty())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ScriptedGenerator;
    use assess_core::model::DifficultyMix;
    use assess_core::time::fixed_now;

    fn batch(levels: &[DifficultyLevel]) -> Vec<Question> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| ScriptedGenerator::placeholder(i, *level, "T").unwrap())
            .collect()
    }

    fn small_settings() -> AssessmentSettings {
        AssessmentSettings::new(4, DifficultyMix::new(1, 1, 1), 2, DifficultyLevel::Medium)
            .unwrap()
    }

    fn started(settings: AssessmentSettings) -> AssessmentSession {
        let mut session = AssessmentSession::new(AssessmentTopic::free("T").unwrap(), settings);
        let mix = session.begin_start().unwrap();
        session.finish_start(batch(&mix), fixed_now()).unwrap();
        session
    }

    fn correct(session: &AssessmentSession, index: usize) -> usize {
        session.questions()[index].correct_option()
    }

    fn wrong(session: &AssessmentSession, index: usize) -> usize {
        (correct(session, index) + 1) % 4
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let session =
            AssessmentSession::new(AssessmentTopic::free("T").unwrap(), small_settings());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.questions().is_empty());
        assert!(session.current_question().is_none());
        assert_eq!(session.difficulty(), DifficultyLevel::Medium);
    }

    #[test]
    fn start_claims_the_slot_once() {
        let mut session =
            AssessmentSession::new(AssessmentTopic::free("T").unwrap(), small_settings());
        let mix = session.begin_start().unwrap();
        assert_eq!(mix.len(), 3);
        assert!(session.is_pending());

        assert!(matches!(
            session.begin_start(),
            Err(SessionError::GenerationPending)
        ));
        assert!(matches!(
            session.begin_advance(),
            Err(SessionError::GenerationPending)
        ));

        session.finish_start(batch(&mix), fixed_now()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(matches!(
            session.begin_start(),
            Err(SessionError::AlreadyStarted)
        ));
    }

    #[test]
    fn short_opening_batch_leaves_session_idle() {
        let mut session =
            AssessmentSession::new(AssessmentTopic::free("T").unwrap(), small_settings());
        session.begin_start().unwrap();

        let err = session
            .finish_start(batch(&[DifficultyLevel::Easy]), fixed_now())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Generation(GenerationError::WrongCount {
                expected: 3,
                actual: 1
            })
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.questions().is_empty());
        assert!(session.begin_start().is_ok());
    }

    #[test]
    fn advance_moves_then_requests_at_current_difficulty() {
        let mut session = started(small_settings());

        assert_eq!(session.begin_advance().unwrap(), AdvanceStep::Moved(1));
        assert_eq!(session.begin_advance().unwrap(), AdvanceStep::Moved(2));
        assert_eq!(
            session.begin_advance().unwrap(),
            AdvanceStep::Extend(DifficultyLevel::Medium)
        );
        assert!(session.is_pending());
        assert_eq!(session.cursor(), 2);

        let cursor = session
            .finish_extension(batch(&[DifficultyLevel::Medium]))
            .unwrap();
        assert_eq!(cursor, 3);
        assert_eq!(session.questions().len(), 4);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn advance_is_a_no_op_at_capacity() {
        let mut session = started(small_settings());
        for _ in 0..2 {
            session.begin_advance().unwrap();
        }
        session.begin_advance().unwrap();
        session
            .finish_extension(batch(&[DifficultyLevel::Easy]))
            .unwrap();

        for _ in 0..5 {
            assert_eq!(session.begin_advance().unwrap(), AdvanceStep::AtCapacity);
        }
        assert_eq!(session.questions().len(), 4);
        assert_eq!(session.cursor(), 3);
        assert!(session.progress().on_final_question());
        assert!(!session.progress().can_advance);
    }

    #[test]
    fn failed_extension_keeps_cursor_and_allows_retry() {
        let mut session = started(small_settings());
        session.begin_advance().unwrap();
        session.begin_advance().unwrap();
        session.begin_advance().unwrap();

        session.cancel_pending();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.questions().len(), 3);

        assert!(matches!(
            session.begin_advance().unwrap(),
            AdvanceStep::Extend(_)
        ));
    }

    #[test]
    fn oversized_extension_is_rejected_whole() {
        let mut session = started(small_settings());
        for _ in 0..3 {
            session.begin_advance().unwrap();
        }
        let err = session
            .finish_extension(batch(&[DifficultyLevel::Easy, DifficultyLevel::Easy]))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Generation(GenerationError::WrongCount {
                expected: 1,
                actual: 2
            })
        ));
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.cursor(), 2);
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[test]
    fn advance_before_start_is_rejected() {
        let mut session =
            AssessmentSession::new(AssessmentTopic::free("T").unwrap(), small_settings());
        assert!(matches!(
            session.begin_advance(),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn go_back_stops_at_first_question() {
        let mut session = started(small_settings());
        session.begin_advance().unwrap();
        assert_eq!(session.go_back(), 0);
        assert_eq!(session.go_back(), 0);
        assert!(!session.progress().can_go_back);
    }

    #[test]
    fn forward_answers_drive_the_controller() {
        let mut session = started(small_settings());

        let first = session.answer_current(correct(&session, 0)).unwrap();
        assert!(first.adapted);
        assert!(first.is_correct);
        session.begin_advance().unwrap();
        let second = session.answer_current(correct(&session, 1)).unwrap();
        assert!(second.adapted);
        assert_eq!(second.difficulty, DifficultyLevel::Hard);
    }

    #[test]
    fn re_answering_after_going_back_does_not_adapt() {
        let mut session = started(small_settings());
        session.answer_current(wrong(&session, 0)).unwrap();
        session.begin_advance().unwrap();
        session.answer_current(correct(&session, 1)).unwrap();

        let before = session.controller().clone();
        session.go_back();
        let redo = session.answer_current(correct(&session, 0)).unwrap();

        assert!(!redo.adapted);
        assert_eq!(redo.previous, Some(wrong(&session, 0)));
        assert_eq!(session.controller(), &before);
        assert_eq!(session.score().correct_count, 2);
    }

    #[test]
    fn changing_the_frontier_answer_does_not_adapt_twice() {
        let mut session = started(small_settings());
        session.answer_current(wrong(&session, 0)).unwrap();
        let again = session.answer_current(wrong(&session, 0)).unwrap();
        assert!(!again.adapted);
        assert_eq!(session.controller().incorrect_streak(), 1);
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut session = started(small_settings());
        let err = session.record_answer(3, 0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Answer(assess_core::model::AnswerError::InvalidIndex { index: 3, len: 3 })
        ));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn submit_requires_a_started_session() {
        let idle = AssessmentSession::new(AssessmentTopic::free("T").unwrap(), small_settings());
        assert!(matches!(
            idle.submit(fixed_now()),
            Err(SessionError::NotStarted)
        ));

        let mut pending = started(small_settings());
        for _ in 0..3 {
            pending.begin_advance().unwrap();
        }
        assert!(matches!(
            pending.submit(fixed_now()),
            Err(SessionError::GenerationPending)
        ));
    }

    #[test]
    fn submit_scores_and_reviews_everything() {
        let mut session = started(small_settings());
        session.answer_current(correct(&session, 0)).unwrap();
        let id = session.id();

        let submission = session.submit(fixed_now()).unwrap();
        assert_eq!(submission.session_id, id);
        assert_eq!(submission.score.correct_count, 1);
        assert_eq!(submission.score.total_questions, 3);
        assert_eq!(submission.score.percentage, 33);
        assert_eq!(submission.review.len(), 3);
        assert!(submission.is_incomplete());
        assert_eq!(submission.elapsed(), chrono::Duration::zero());
    }
}
