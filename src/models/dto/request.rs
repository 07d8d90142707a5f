use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, OPTION_COUNT};
use crate::models::domain::{Difficulty, ResourceType};

static SUBJECT_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,19}$")
        .expect("SUBJECT_CODE_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTermRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(range(min = 0))]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTermRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(regex(
        path = *SUBJECT_CODE_REGEX,
        message = "Subject code must be alphanumeric with dashes or underscores"
    ))]
    pub code: String,

    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(regex(
        path = *SUBJECT_CODE_REGEX,
        message = "Subject code must be alphanumeric with dashes or underscores"
    ))]
    pub code: Option<String>,

    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub resource_type: ResourceType,

    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub resource_type: Option<ResourceType>,

    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttachFileParams {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceListParams {
    pub published_only: Option<bool>,
}

/// A question as written by an authoring client. `correct_option_index` is
/// 0-based.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthoredQuestion {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,

    #[validate(custom(function = "validate_options"))]
    pub options: [String; OPTION_COUNT],

    #[validate(range(max = 3))]
    pub correct_option_index: usize,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

fn validate_options(options: &[String; OPTION_COUNT]) -> Result<(), ValidationError> {
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(ValidationError::new("empty_option"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: i32,

    pub difficulty: Option<Difficulty>,

    pub is_active: Option<bool>,

    #[validate(nested)]
    pub questions: Vec<AuthoredQuestion>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuizSettingsRequest {
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,

    pub difficulty: Option<Difficulty>,

    pub is_active: Option<bool>,
}

/// Answers keyed by question id; values are 1-based option indices.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    pub answers: HashMap<String, i32>,

    #[validate(range(min = 0))]
    pub time_spent: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,

    pub quiz_id: Option<String>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(DEFAULT_PAGE_SIZE),
            quiz_id: None,
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}
