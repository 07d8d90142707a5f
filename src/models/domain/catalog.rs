use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A school class (grade level). `order` is unique across all classes and
/// drives every listing of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// A term owned by exactly one class. `order` and `name` are unique within
/// the owning class.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Term {
    pub id: String,
    pub class_id: String,
    pub name: String,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// A subject taught during a term. `code` is unique within the owning term;
/// `order` is a display rank only.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subject {
    pub id: String,
    pub term_id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Class {
    pub fn new(name: &str, description: Option<&str>, order: i32) -> Self {
        Class {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            order,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

impl Term {
    pub fn new(class_id: &str, name: &str, order: i32) -> Self {
        Term {
            id: Uuid::new_v4().to_string(),
            class_id: class_id.to_string(),
            name: name.to_string(),
            order,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

impl Subject {
    pub fn new(term_id: &str, name: &str, code: &str, order: i32) -> Self {
        Subject {
            id: Uuid::new_v4().to_string(),
            term_id: term_id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            order,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

/// Display order for subjects within a term: by `order`, then by `name`.
pub fn sort_subjects(subjects: &mut [Subject]) {
    subjects.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
}
