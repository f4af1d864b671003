use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on skills carried into a skills-based assessment.
pub const MAX_SKILLS: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic cannot be empty")]
    EmptyTopic,

    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("standard or year cannot be empty")]
    EmptyStandard,

    #[error("college assessments require a course")]
    MissingCourse,

    #[error("at least one skill is required")]
    NoSkills,
}

/// Academic level a subject assessment is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyLevel {
    School,
    College,
}

impl StudyLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::School => "school",
            Self::College => "college",
        }
    }
}

/// What the generated questions should be about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentTopic {
    /// A bare topic name such as "Algebra".
    Free { name: String },
    /// A subject pitched at a school standard or a college year and course.
    Subject {
        level: StudyLevel,
        standard: String,
        course: Option<String>,
        subject: String,
    },
    /// Skills extracted from a resume.
    Skills { skills: Vec<String> },
}

impl AssessmentTopic {
    /// # Errors
    ///
    /// Returns `TopicError::EmptyTopic` if `name` is blank.
    pub fn free(name: impl Into<String>) -> Result<Self, TopicError> {
        let name = non_blank(name.into()).ok_or(TopicError::EmptyTopic)?;
        Ok(Self::Free { name })
    }

    /// # Errors
    ///
    /// Returns `TopicError` if the subject or standard is blank, or if a college
    /// assessment has no course.
    pub fn subject(
        level: StudyLevel,
        standard: impl Into<String>,
        course: Option<String>,
        subject: impl Into<String>,
    ) -> Result<Self, TopicError> {
        let standard = non_blank(standard.into()).ok_or(TopicError::EmptyStandard)?;
        let subject = non_blank(subject.into()).ok_or(TopicError::EmptySubject)?;
        let course = course.and_then(non_blank);
        if level == StudyLevel::College && course.is_none() {
            return Err(TopicError::MissingCourse);
        }
        Ok(Self::Subject {
            level,
            standard,
            course,
            subject,
        })
    }

    /// Blank entries are dropped and at most [`MAX_SKILLS`] are kept.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::NoSkills` if nothing usable remains.
    pub fn skills<I, S>(skills: I) -> Result<Self, TopicError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let skills: Vec<String> = skills
            .into_iter()
            .filter_map(|s| non_blank(s.into()))
            .take(MAX_SKILLS)
            .collect();
        if skills.is_empty() {
            return Err(TopicError::NoSkills);
        }
        Ok(Self::Skills { skills })
    }

    /// Short human label, e.g. for log lines and headers.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Free { name } => name.clone(),
            Self::Subject { subject, .. } => subject.clone(),
            Self::Skills { skills } => skills.join(", "),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_topic_is_trimmed() {
        let topic = AssessmentTopic::free("  Algebra ").unwrap();
        assert_eq!(topic.describe(), "Algebra");
        assert_eq!(AssessmentTopic::free("  ").unwrap_err(), TopicError::EmptyTopic);
    }

    #[test]
    fn college_subject_needs_course() {
        let err = AssessmentTopic::subject(StudyLevel::College, "2nd Year", None, "Thermodynamics")
            .unwrap_err();
        assert_eq!(err, TopicError::MissingCourse);

        let err = AssessmentTopic::subject(
            StudyLevel::College,
            "2nd Year",
            Some("   ".into()),
            "Thermodynamics",
        )
        .unwrap_err();
        assert_eq!(err, TopicError::MissingCourse);

        let ok = AssessmentTopic::subject(
            StudyLevel::College,
            "2nd Year",
            Some("Engineering (B.Tech/B.E.)".into()),
            "Thermodynamics",
        )
        .unwrap();
        assert_eq!(ok.describe(), "Thermodynamics");
    }

    #[test]
    fn school_subject_validates_fields() {
        assert_eq!(
            AssessmentTopic::subject(StudyLevel::School, "", None, "Physics").unwrap_err(),
            TopicError::EmptyStandard
        );
        assert_eq!(
            AssessmentTopic::subject(StudyLevel::School, "9th", None, " ").unwrap_err(),
            TopicError::EmptySubject
        );
        assert!(AssessmentTopic::subject(StudyLevel::School, "9th", None, "Physics").is_ok());
    }

    #[test]
    fn skills_drop_blanks_and_cap() {
        let topic = AssessmentTopic::skills(["Rust", " ", "SQL "]).unwrap();
        assert_eq!(topic.describe(), "Rust, SQL");

        let many = (0..30).map(|i| format!("skill{i}"));
        let AssessmentTopic::Skills { skills } = AssessmentTopic::skills(many).unwrap() else {
            panic!("expected skills topic");
        };
        assert_eq!(skills.len(), MAX_SKILLS);

        assert_eq!(
            AssessmentTopic::skills(Vec::<String>::new()).unwrap_err(),
            TopicError::NoSkills
        );
    }
}
