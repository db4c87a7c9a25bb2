use crate::models::domain::{Answer, Question};

/// Result of scoring one quiz submission against an assignment's questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct_count: i16,
    pub total_count: i16,
    pub score_percent: i16,
}

pub struct QuizGrader;

impl QuizGrader {
    /// Score submitted answers against the question list. Never fails:
    /// missing answers, duplicate answers (first one wins) and out-of-range
    /// option indices all count as incorrect, so a malformed client payload
    /// can never block scoring. Deterministic and side-effect free, so it is
    /// safe to run both at submit time and again when rendering a review.
    pub fn grade(questions: &[Question], answers: &[Answer]) -> QuizScore {
        let total_count = questions.len();

        if total_count == 0 {
            log::warn!("Grading a quiz with no questions; score defaults to 0");
            return QuizScore {
                correct_count: 0,
                total_count: 0,
                score_percent: 0,
            };
        }

        let correct_count = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                let answer = answers.iter().find(|a| a.question_index == *index);
                Self::is_answer_correct(question, answer)
            })
            .count();

        let score_percent =
            (100.0 * correct_count as f64 / total_count as f64).round() as i16;

        QuizScore {
            correct_count: correct_count as i16,
            total_count: total_count as i16,
            score_percent,
        }
    }

    pub fn is_answer_correct(question: &Question, answer: Option<&Answer>) -> bool {
        match answer {
            Some(answer) => {
                answer.selected_option_index < question.options.len()
                    && answer.selected_option_index == question.correct_option_index
            }
            None => false,
        }
    }
}
