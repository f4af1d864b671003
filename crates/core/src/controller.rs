use serde::{Deserialize, Serialize};

use crate::model::{AssessmentSettings, DifficultyLevel};

//
// ─── DIFFICULTY CONTROLLER ─────────────────────────────────────────────────────
//

/// Streak-threshold difficulty adaptation.
///
/// Each recorded outcome extends its own streak and clears the opposite one.
/// Once a streak reaches the threshold the difficulty moves one step in that
/// direction and the streak starts over; at either end of the scale the
/// difficulty stays put and the streak keeps counting.
///
/// # Examples
///
/// ```
/// # use assess_core::DifficultyController;
/// # use assess_core::model::DifficultyLevel;
/// let mut controller = DifficultyController::new();
/// controller.record_outcome(true);
/// assert_eq!(controller.record_outcome(true), DifficultyLevel::Hard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyController {
    difficulty: DifficultyLevel,
    correct_streak: u32,
    incorrect_streak: u32,
    threshold: u32,
}

impl DifficultyController {
    /// Starts at medium with a threshold of two.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(DifficultyLevel::Medium, 2)
    }

    /// A zero threshold is treated as one.
    #[must_use]
    pub fn starting_at(difficulty: DifficultyLevel, threshold: u32) -> Self {
        Self {
            difficulty,
            correct_streak: 0,
            incorrect_streak: 0,
            threshold: threshold.max(1),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &AssessmentSettings) -> Self {
        Self::starting_at(settings.starting_difficulty(), settings.streak_threshold())
    }

    /// Feed one answer outcome and return the difficulty after the update.
    pub fn record_outcome(&mut self, correct: bool) -> DifficultyLevel {
        if correct {
            self.correct_streak = self.correct_streak.saturating_add(1);
            self.incorrect_streak = 0;
            if self.correct_streak >= self.threshold {
                if let Some(next) = self.difficulty.harder() {
                    self.difficulty = next;
                    self.correct_streak = 0;
                }
            }
        } else {
            self.incorrect_streak = self.incorrect_streak.saturating_add(1);
            self.correct_streak = 0;
            if self.incorrect_streak >= self.threshold {
                if let Some(next) = self.difficulty.easier() {
                    self.difficulty = next;
                    self.incorrect_streak = 0;
                }
            }
        }
        self.difficulty
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    #[must_use]
    pub fn correct_streak(&self) -> u32 {
        self.correct_streak
    }

    #[must_use]
    pub fn incorrect_streak(&self) -> u32 {
        self.incorrect_streak
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
