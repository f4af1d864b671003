use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DifficultyLevel, DifficultyMix};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("initial batch must request at least one question")]
    EmptyInitialBatch,

    #[error("max length ({max_length}) must be >= initial batch size ({initial})")]
    MaxLengthBelowInitialBatch { max_length: usize, initial: usize },

    #[error("streak threshold must be > 0")]
    InvalidStreakThreshold,
}

/// Tunables for one assessment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSettings {
    max_length: usize,
    initial_mix: DifficultyMix,
    streak_threshold: u32,
    starting_difficulty: DifficultyLevel,
}

impl AssessmentSettings {
    /// The stock configuration:
    /// - 15 questions at most
    /// - an opening batch of 3 easy, 4 medium and 3 hard questions
    /// - two answers in a row move the difficulty one step
    /// - adaptation starts at medium
    #[must_use]
    pub fn standard() -> Self {
        Self {
            max_length: 15,
            initial_mix: DifficultyMix::standard(),
            streak_threshold: 2,
            starting_difficulty: DifficultyLevel::Medium,
        }
    }

    /// # Errors
    ///
    /// Returns `SettingsError` if the opening batch is empty, does not fit in
    /// `max_length`, or the streak threshold is zero.
    pub fn new(
        max_length: usize,
        initial_mix: DifficultyMix,
        streak_threshold: u32,
        starting_difficulty: DifficultyLevel,
    ) -> Result<Self, SettingsError> {
        if initial_mix.is_empty() {
            return Err(SettingsError::EmptyInitialBatch);
        }
        if max_length < initial_mix.total() {
            return Err(SettingsError::MaxLengthBelowInitialBatch {
                max_length,
                initial: initial_mix.total(),
            });
        }
        if streak_threshold == 0 {
            return Err(SettingsError::InvalidStreakThreshold);
        }
        Ok(Self {
            max_length,
            initial_mix,
            streak_threshold,
            starting_difficulty,
        })
    }

    /// Same settings with a different cap.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::MaxLengthBelowInitialBatch` if the cap is too small.
    pub fn with_max_length(self, max_length: usize) -> Result<Self, SettingsError> {
        Self::new(
            max_length,
            self.initial_mix,
            self.streak_threshold,
            self.starting_difficulty,
        )
    }

    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub fn initial_mix(&self) -> DifficultyMix {
        self.initial_mix
    }

    #[must_use]
    pub fn initial_batch_size(&self) -> usize {
        self.initial_mix.total()
    }

    #[must_use]
    pub fn streak_threshold(&self) -> u32 {
        self.streak_threshold
    }

    #[must_use]
    pub fn starting_difficulty(&self) -> DifficultyLevel {
        self.starting_difficulty
    }
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_settings_match_stock_values() {
        let s = AssessmentSettings::default();
        assert_eq!(s.max_length(), 15);
        assert_eq!(s.initial_batch_size(), 10);
        assert_eq!(s.streak_threshold(), 2);
        assert_eq!(s.starting_difficulty(), DifficultyLevel::Medium);
    }

    #[test]
    fn rejects_cap_below_opening_batch() {
        let err = AssessmentSettings::standard().with_max_length(9).unwrap_err();
        assert_eq!(
            err,
            SettingsError::MaxLengthBelowInitialBatch {
                max_length: 9,
                initial: 10
            }
        );
        assert!(AssessmentSettings::standard().with_max_length(10).is_ok());
    }

    #[test]
    fn rejects_empty_mix_and_zero_threshold() {
        assert_eq!(
            AssessmentSettings::new(5, DifficultyMix::new(0, 0, 0), 2, DifficultyLevel::Easy)
                .unwrap_err(),
            SettingsError::EmptyInitialBatch
        );
        assert_eq!(
            AssessmentSettings::new(5, DifficultyMix::new(1, 1, 1), 0, DifficultyLevel::Easy)
                .unwrap_err(),
            SettingsError::InvalidStreakThreshold
        );
    }
}
