use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── DIFFICULTY LEVEL ──────────────────────────────────────────────────────────
//

/// Three-step difficulty scale used to tag questions and to steer generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    /// One step up, or `None` at `Hard`.
    #[must_use]
    pub fn harder(self) -> Option<Self> {
        match self {
            Self::Easy => Some(Self::Medium),
            Self::Medium => Some(Self::Hard),
            Self::Hard => None,
        }
    }

    /// One step down, or `None` at `Easy`.
    #[must_use]
    pub fn easier(self) -> Option<Self> {
        match self {
            Self::Easy => None,
            Self::Medium => Some(Self::Easy),
            Self::Hard => Some(Self::Medium),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Case-insensitive lookup by label, tolerant of surrounding whitespace.
    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── DIFFICULTY MIX ────────────────────────────────────────────────────────────
//

/// How many questions of each difficulty a batch request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyMix {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyMix {
    #[must_use]
    pub fn new(easy: usize, medium: usize, hard: usize) -> Self {
        Self { easy, medium, hard }
    }

    /// The 3 easy / 4 medium / 3 hard opening batch.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(3, 4, 3)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Expands the counts into an ordered request sequence, easiest first.
    #[must_use]
    pub fn levels(&self) -> Vec<DifficultyLevel> {
        let mut levels = Vec::with_capacity(self.total());
        levels.extend(std::iter::repeat_n(DifficultyLevel::Easy, self.easy));
        levels.extend(std::iter::repeat_n(DifficultyLevel::Medium, self.medium));
        levels.extend(std::iter::repeat_n(DifficultyLevel::Hard, self.hard));
        levels
    }
}

impl Default for DifficultyMix {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_saturate_at_the_ends() {
        assert_eq!(DifficultyLevel::Easy.harder(), Some(DifficultyLevel::Medium));
        assert_eq!(DifficultyLevel::Medium.harder(), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::Hard.harder(), None);
        assert_eq!(DifficultyLevel::Hard.easier(), Some(DifficultyLevel::Medium));
        assert_eq!(DifficultyLevel::Easy.easier(), None);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(DifficultyLevel::from_label(" HARD "), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::from_label("Medium"), Some(DifficultyLevel::Medium));
        assert_eq!(DifficultyLevel::from_label("expert"), None);
        assert_eq!(DifficultyLevel::Easy.to_string(), "easy");
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&DifficultyLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn standard_mix_expands_in_order() {
        let mix = DifficultyMix::standard();
        let levels = mix.levels();
        assert_eq!(levels.len(), 10);
        assert_eq!(
            levels.iter().filter(|l| **l == DifficultyLevel::Easy).count(),
            3
        );
        assert_eq!(
            levels.iter().filter(|l| **l == DifficultyLevel::Medium).count(),
            4
        );
        assert_eq!(levels.first(), Some(&DifficultyLevel::Easy));
        assert_eq!(levels.last(), Some(&DifficultyLevel::Hard));
    }
}
