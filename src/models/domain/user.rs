use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user record as written by the identity collaborator. Only the class
/// enrollment matters here: a class with enrolled users cannot be deleted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    #[default]
    Student,
}

impl UserRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "teacher" => Some(UserRole::Teacher),
            "student" => Some(UserRole::Student),
            _ => None,
        }
    }
}

impl User {
    pub fn new(username: &str, full_name: &str, role: UserRole, class_id: Option<&str>) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            role,
            class_id: class_id.map(str::to_string),
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_student(username: &str, class_id: &str) -> Self {
        User::new(username, "Test Student", UserRole::Student, Some(class_id))
    }
}
