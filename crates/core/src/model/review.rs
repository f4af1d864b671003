use serde::Serialize;

use crate::model::{AnswerSheet, Question};

/// One row of the post-test review: what was asked, what was chosen, what was right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub position: usize,
    pub question: Question,
    pub chosen_option: Option<usize>,
    pub is_correct: bool,
    pub correct_option: usize,
}

impl ReviewEntry {
    #[must_use]
    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen_option.and_then(|o| self.question.option(o))
    }

    #[must_use]
    pub fn correct_text(&self) -> &str {
        self.question.correct_text()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.chosen_option.is_some()
    }
}

/// Pair every question with its final stored answer, in question order.
#[must_use]
pub fn build_review(questions: &[Question], answers: &AnswerSheet) -> Vec<ReviewEntry> {
    questions
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let chosen_option = answers.get(position);
            ReviewEntry {
                position,
                question: question.clone(),
                chosen_option,
                is_correct: chosen_option.is_some_and(|o| question.is_correct(o)),
                correct_option: question.correct_option(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DifficultyLevel;

    fn question(correct: usize) -> Question {
        Question::new(
            "Pick one",
            vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct,
            DifficultyLevel::Easy,
        )
        .unwrap()
    }

    #[test]
    fn review_covers_every_question_in_order() {
        let questions = vec![question(0), question(1), question(2)];
        let mut answers = AnswerSheet::new();
        answers.record(&questions, 0, 0).unwrap();
        answers.record(&questions, 2, 3).unwrap();

        let review = build_review(&questions, &answers);
        assert_eq!(review.len(), 3);

        assert!(review[0].is_correct);
        assert_eq!(review[0].chosen_text(), Some("w"));

        assert!(!review[1].is_correct);
        assert!(!review[1].is_answered());
        assert_eq!(review[1].chosen_text(), None);
        assert_eq!(review[1].correct_text(), "x");

        assert!(!review[2].is_correct);
        assert_eq!(review[2].chosen_option, Some(3));
        assert_eq!(review[2].correct_option, 2);
        assert_eq!(review[2].position, 2);
    }

    #[test]
    fn review_uses_final_answer_only() {
        let questions = vec![question(1)];
        let mut answers = AnswerSheet::new();
        answers.record(&questions, 0, 0).unwrap();
        answers.record(&questions, 0, 1).unwrap();

        let review = build_review(&questions, &answers);
        assert!(review[0].is_correct);
        assert_eq!(review[0].chosen_option, Some(1));
    }
}
