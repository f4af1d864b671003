use serde::Serialize;
use std::fmt;

use crate::model::{AnswerSheet, Question};

//
// ─── GRADE BAND ────────────────────────────────────────────────────────────────
//

/// Qualitative label for a percentage score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradeBand {
    /// 90 and above.
    Excellent,
    /// 75 to 89.
    Great,
    /// 60 to 74.
    Good,
    /// 40 to 59.
    Fair,
    /// Below 40.
    NeedsImprovement,
}

impl GradeBand {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            75.. => Self::Great,
            60.. => Self::Good,
            40.. => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Great => "Great",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── SCORE RESULT ──────────────────────────────────────────────────────────────
//

/// Outcome of scoring a set of questions against the recorded answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total_answered: usize,
    pub total_questions: usize,
    pub percentage: u32,
}

impl ScoreResult {
    /// Score every question in `questions`.
    ///
    /// Unanswered questions count as incorrect. The percentage is rounded half
    /// up and is 0 when there are no questions.
    #[must_use]
    pub fn compute(questions: &[Question], answers: &AnswerSheet) -> Self {
        let correct_count = questions
            .iter()
            .enumerate()
            .filter(|(i, q)| answers.get(*i).is_some_and(|o| q.is_correct(o)))
            .count();
        let total_answered = (0..questions.len())
            .filter(|i| answers.is_answered(*i))
            .count();

        Self {
            correct_count,
            total_answered,
            total_questions: questions.len(),
            percentage: rounded_percentage(correct_count, questions.len()),
        }
    }

    #[must_use]
    pub fn grade(&self) -> GradeBand {
        GradeBand::from_percentage(self.percentage)
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.total_questions - self.correct_count
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions - self.total_answered
    }
}

fn rounded_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
