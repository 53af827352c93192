//! Exam auto-grading.
//!
//! Answers are compared position by position against each question's
//! answer key. Grading never fails: unanswered, out-of-range and missing
//! positions are simply counted as incorrect, and surplus answers past the
//! last question are ignored.

use serde::{Deserialize, Serialize};

use crate::types::Question;

/// Outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub score: i32,
    pub total: i32,
}

impl Grade {
    /// Score as a percentage of total, 0 for an empty exam.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) * 100.0 / f64::from(self.total)
    }
}

/// Grade a submission against an exam's questions.
pub fn grade(questions: &[Question], answers: &[Option<i64>]) -> Grade {
    let score = questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, answer)| **answer == Some(question.answer))
        .count();

    Grade {
        score: score as i32,
        total: questions.len() as i32,
    }
}
