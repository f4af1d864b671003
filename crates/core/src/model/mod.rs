mod answers;
mod difficulty;
mod ids;
mod question;
mod review;
mod settings;
mod topic;

pub use answers::{AnswerError, AnswerSheet};
pub use difficulty::{DifficultyLevel, DifficultyMix};
pub use ids::SessionId;
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use review::{ReviewEntry, build_review};
pub use settings::{AssessmentSettings, SettingsError};
pub use topic::{AssessmentTopic, MAX_SKILLS, StudyLevel, TopicError};
