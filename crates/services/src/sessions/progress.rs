/// Navigation state of a session, for driving Previous/Next/Submit controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub cursor: usize,
    pub available: usize,
    pub max_length: usize,
    pub answered: usize,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub at_capacity: bool,
    pub pending: bool,
}

impl SessionProgress {
    /// The presented question is the last one the session will ever hold.
    #[must_use]
    pub fn on_final_question(&self) -> bool {
        self.at_capacity && self.cursor + 1 == self.available
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.available.saturating_sub(self.answered)
    }
}
