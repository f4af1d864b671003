mod progress;
mod service;
mod submission;
mod workflow;

// Public API of the assessment session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AnswerRecorded, AssessmentSession, SessionPhase};
pub use submission::Submission;
pub use workflow::{AdvanceOutcome, AssessmentLoopService};
