use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{DEFAULT_QUESTION_MARKS, OPTION_COUNT},
    errors::{AppError, AppResult},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// 1-based index into `options`.
    pub correct_answer: i32,
    pub explanation: Option<String>,
    pub order: i32,
    #[serde(default = "default_marks")]
    pub marks: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_marks() -> i32 {
    DEFAULT_QUESTION_MARKS
}

/// Converts the 0-based option index used by authoring clients into the
/// 1-based index persisted on a question.
pub fn authored_to_stored_index(authored_index: usize) -> AppResult<i32> {
    if authored_index >= OPTION_COUNT {
        return Err(AppError::ValidationError(format!(
            "Correct option index {} is out of range (0..{})",
            authored_index, OPTION_COUNT
        )));
    }
    Ok(authored_index as i32 + 1)
}

/// Inverse of [`authored_to_stored_index`]. Only used when a question is
/// handed back to an authoring client; grading compares stored indices.
pub fn stored_to_authored_index(stored_index: i32) -> AppResult<usize> {
    if stored_index < 1 || stored_index as usize > OPTION_COUNT {
        return Err(AppError::InternalError(format!(
            "Stored correct answer {} is out of range (1..={})",
            stored_index, OPTION_COUNT
        )));
    }
    Ok((stored_index - 1) as usize)
}

impl QuizQuestion {
    pub fn new(
        text: &str,
        options: [String; OPTION_COUNT],
        authored_correct_index: usize,
        explanation: Option<&str>,
        order: i32,
    ) -> AppResult<Self> {
        Ok(QuizQuestion {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            options,
            correct_answer: authored_to_stored_index(authored_correct_index)?,
            explanation: explanation.map(str::to_string),
            order,
            marks: DEFAULT_QUESTION_MARKS,
            created_at: Some(Utc::now()),
        })
    }

    pub fn is_correct(&self, selected_answer: i32) -> bool {
        selected_answer == self.correct_answer
    }
}
