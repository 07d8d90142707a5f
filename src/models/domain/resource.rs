use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resource {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub description: Option<String>,
    pub resource_type: ResourceType,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub is_published: bool,
    pub created_by_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Syllabus,
    QuestionPaper,
    Quiz,
    StudyMaterial,
    Other,
}

/// What the file storage collaborator hands back for an accepted upload.
/// `file_url` is opaque to everything in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredFile {
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
}

impl Resource {
    pub fn new(
        subject_id: &str,
        title: &str,
        description: Option<&str>,
        resource_type: ResourceType,
        is_published: bool,
        created_by_user_id: &str,
    ) -> Self {
        Resource {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            resource_type,
            file_url: None,
            file_name: None,
            file_size: None,
            is_published,
            created_by_user_id: created_by_user_id.to_string(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_quiz(&self) -> bool {
        self.resource_type == ResourceType::Quiz
    }

    pub fn attach_file(&mut self, file: StoredFile) {
        self.file_url = Some(file.file_url);
        self.file_name = Some(file.file_name);
        self.file_size = Some(file.file_size);
        self.modified_at = Some(Utc::now());
    }
}
