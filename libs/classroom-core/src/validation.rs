//! Input validation applied before anything reaches storage.

use crate::error::{Result, ValidationError};
use crate::types::Question;

/// Reject blank strings.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Minimal structural email check: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || ValidationError::new("email", format!("invalid email address '{}'", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Exam duration in minutes must be positive.
pub fn validate_duration(minutes: i32) -> Result<()> {
    if minutes <= 0 {
        return Err(ValidationError::new("duration", "must be a positive number of minutes"));
    }
    Ok(())
}

/// Check a question's prompt, choices and answer key.
pub fn validate_question(index: usize, question: &Question) -> Result<()> {
    let field = format!("questions[{}]", index);

    if question.prompt.trim().is_empty() {
        return Err(ValidationError::new(field, "prompt must not be empty"));
    }
    if question.choices.len() < 2 {
        return Err(ValidationError::new(field, "needs at least two choices"));
    }
    if question.answer < 0 || question.answer as usize >= question.choices.len() {
        return Err(ValidationError::new(
            field,
            format!(
                "answer index {} is outside 0..{}",
                question.answer,
                question.choices.len()
            ),
        ));
    }

    Ok(())
}

/// Validate every question of an exam.
pub fn validate_questions(questions: &[Question]) -> Result<()> {
    questions
        .iter()
        .enumerate()
        .try_for_each(|(i, q)| validate_question(i, q))
}
