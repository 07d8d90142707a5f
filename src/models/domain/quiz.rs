use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{PASS_RATIO_DENOMINATOR, PASS_RATIO_NUMERATOR},
    models::domain::quiz_question::QuizQuestion,
};

/// A quiz attached 1:1 to a `QUIZ` resource. Questions are embedded and kept
/// in ascending `order`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub resource_id: String,
    pub title: String,
    pub duration_minutes: i32,
    pub difficulty: Difficulty,
    pub total_marks: i32,
    pub passing_marks: i32,
    pub is_active: bool,
    pub questions: Vec<QuizQuestion>,
    pub created_by_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// ceil(60% of total), computed in integers.
pub fn passing_marks_for(total_marks: i32) -> i32 {
    (total_marks * PASS_RATIO_NUMERATOR + PASS_RATIO_DENOMINATOR - 1) / PASS_RATIO_DENOMINATOR
}

impl Quiz {
    pub fn new(
        resource_id: &str,
        title: &str,
        duration_minutes: i32,
        difficulty: Difficulty,
        is_active: bool,
        mut questions: Vec<QuizQuestion>,
        created_by_user_id: &str,
    ) -> Self {
        questions.sort_by_key(|q| q.order);
        let total_marks = questions.len() as i32;

        Quiz {
            id: Uuid::new_v4().to_string(),
            resource_id: resource_id.to_string(),
            title: title.to_string(),
            duration_minutes,
            difficulty,
            total_marks,
            passing_marks: passing_marks_for(total_marks),
            is_active,
            questions,
            created_by_user_id: created_by_user_id.to_string(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}
