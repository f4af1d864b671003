use chrono::{DateTime, Utc};
use serde::Serialize;

use assess_core::model::{AssessmentTopic, DifficultyLevel, ReviewEntry, SessionId};
use assess_core::{GradeBand, ScoreResult};

/// Everything the results screen needs once a session is handed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub session_id: SessionId,
    pub topic: AssessmentTopic,
    pub score: ScoreResult,
    pub grade: GradeBand,
    pub review: Vec<ReviewEntry>,
    pub final_difficulty: DifficultyLevel,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// True when some questions were left unanswered.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.score.unanswered_count() > 0
    }

    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.submitted_at - self.started_at
    }
}
