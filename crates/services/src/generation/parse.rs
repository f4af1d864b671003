use serde::Deserialize;

use assess_core::model::{DifficultyLevel, Question};

use crate::error::GenerationError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Parse a collaborator reply into exactly `mix.len()` questions.
///
/// The reply may wrap the JSON array in prose or code fences; the outermost
/// `[` .. `]` span is used. A missing or unknown `difficulty` falls back to the
/// level requested at that position.
///
/// # Errors
///
/// Returns `GenerationError` if the reply is empty, holds no array, is not valid
/// question JSON, has the wrong number of items, or any item fails validation.
pub fn parse_questions(
    response: &str,
    mix: &[DifficultyLevel],
) -> Result<Vec<Question>, GenerationError> {
    if response.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let json = extract_json_array(response).ok_or(GenerationError::MissingJsonArray)?;
    let raw: Vec<RawQuestion> = serde_json::from_str(json)?;

    if raw.len() != mix.len() {
        return Err(GenerationError::WrongCount {
            expected: mix.len(),
            actual: raw.len(),
        });
    }

    raw.into_iter()
        .zip(mix)
        .enumerate()
        .map(|(index, (item, requested))| {
            let difficulty = item
                .difficulty
                .as_deref()
                .and_then(DifficultyLevel::from_label)
                .unwrap_or(*requested);
            Question::new(item.question, item.options, item.correct_answer, difficulty)
                .map_err(|source| GenerationError::InvalidQuestion { index, source })
        })
        .collect()
}

fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
