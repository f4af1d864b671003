use std::fmt::Write as _;

use assess_core::model::{AssessmentTopic, DifficultyLevel, OPTION_COUNT, StudyLevel};

/// Render the instruction text sent to the generation collaborator.
#[must_use]
pub fn build_prompt(topic: &AssessmentTopic, mix: &[DifficultyLevel]) -> String {
    let count = mix.len();
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Generate exactly {count} multiple-choice question{} {}.",
        if count == 1 { "" } else { "s" },
        topic_clause(topic)
    );
    prompt.push('\n');

    match topic {
        AssessmentTopic::Free { .. } => {}
        AssessmentTopic::Subject {
            level,
            standard,
            course,
            subject,
        } => {
            let _ = writeln!(prompt, "Study level: {}", level.label());
            match level {
                StudyLevel::School => {
                    let _ = writeln!(prompt, "Standard: {standard}");
                }
                StudyLevel::College => {
                    let _ = writeln!(prompt, "Year: {standard}");
                    if let Some(course) = course {
                        let _ = writeln!(prompt, "Course: {course}");
                    }
                }
            }
            let _ = writeln!(
                prompt,
                "Questions must stay strictly within \"{subject}\" and suit this level."
            );
            prompt.push('\n');
        }
        AssessmentTopic::Skills { .. } => {
            prompt.push_str(
                "Test practical knowledge a candidate listing these skills should have.\n\n",
            );
        }
    }

    prompt.push_str("Difficulty of each question, in order:\n");
    for (i, level) in mix.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {level}", i + 1);
    }
    prompt.push('\n');

    let _ = writeln!(
        prompt,
        "Each question has exactly {OPTION_COUNT} options. Reply with a JSON array only:"
    );
    prompt.push_str(concat!(
        "[\n",
        "  {\n",
        "    \"question\": \"Question text?\",\n",
        "    \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n",
        "    \"correctAnswer\": 0,\n",
        "    \"difficulty\": \"easy\"\n",
        "  }\n",
        "]\n",
    ));
    let _ = writeln!(
        prompt,
        "correctAnswer is the index (0-{}) of the correct option; difficulty is easy, medium or hard.",
        OPTION_COUNT - 1
    );
    prompt.push_str("Return only valid JSON, no other text.");
    prompt
}

fn topic_clause(topic: &AssessmentTopic) -> String {
    match topic {
        AssessmentTopic::Free { name } => format!("about \"{name}\""),
        AssessmentTopic::Subject { level, subject, .. } => {
            format!("on \"{subject}\" for a {} student", level.label())
        }
        AssessmentTopic::Skills { skills } => {
            format!("based on these skills: {}", skills.join(", "))
        }
    }
}
