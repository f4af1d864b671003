#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod sessions;

pub use assess_core::Clock;

pub use error::{GenerationError, SessionError};
pub use generation::{ChatQuestionGenerator, GeneratorConfig, QuestionGenerator, ScriptedGenerator};

pub use sessions::{
    AdvanceOutcome, AnswerRecorded, AssessmentLoopService, AssessmentSession, SessionPhase,
    SessionProgress, Submission,
};
