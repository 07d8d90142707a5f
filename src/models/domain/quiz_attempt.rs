use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A graded submission. Attempts are never updated; a retake produces a new
/// attempt.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub passed: bool,
    /// Seconds, as reported by the client.
    pub time_spent: i64,
    pub is_completed: bool,
    /// Stored as a BSON datetime so history sorts chronologically.
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<AttemptAnswer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub id: String,
    pub question_id: String,
    pub quiz_attempt_id: String,
    pub selected_answer: i32,
    pub is_correct: bool,
    pub marks_awarded: i32,
}
