use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{DependentCounts, Resource, ResourceType},
        dto::request::{CreateResourceRequest, UpdateResourceRequest},
    },
    repositories::{QuizAttemptRepository, QuizRepository, ResourceRepository, SubjectRepository},
    services::file_store::{FileStore, FileUpload},
};

pub struct ResourceService {
    subjects: Arc<dyn SubjectRepository>,
    resources: Arc<dyn ResourceRepository>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    files: Arc<dyn FileStore>,
}

impl ResourceService {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        resources: Arc<dyn ResourceRepository>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            subjects,
            resources,
            quizzes,
            attempts,
            files,
        }
    }

    async fn ensure_subject(&self, subject_id: &str) -> AppResult<()> {
        if self.subjects.find_by_id(subject_id).await?.is_none() {
            log::warn!("Rejecting resource mutation for unknown subject {}", subject_id);
            return Err(AppError::UnknownSubject(subject_id.to_string()));
        }
        Ok(())
    }

    /// Creates a resource under `subject_id`. The subject is checked before
    /// any upload is handed to the file store.
    pub async fn create_resource(
        &self,
        subject_id: &str,
        request: CreateResourceRequest,
        created_by: &str,
        file: Option<FileUpload>,
    ) -> AppResult<Resource> {
        request.validate()?;
        self.ensure_subject(subject_id).await?;

        let mut resource = Resource::new(
            subject_id,
            request.title.trim(),
            request.description.as_deref(),
            request.resource_type,
            request.is_published.unwrap_or(false),
            created_by,
        );

        let stored_url = match file {
            Some(upload) => {
                let stored = self.files.store(upload).await?;
                let url = stored.file_url.clone();
                resource.attach_file(stored);
                Some(url)
            }
            None => None,
        };

        let resource = match self.resources.create(resource).await {
            Ok(resource) => resource,
            Err(e) => {
                if let Some(url) = stored_url {
                    self.discard_stored_file(&url).await;
                }
                return Err(e);
            }
        };
        log::info!(
            "Created {:?} resource {} in subject {}",
            resource.resource_type,
            resource.id,
            subject_id
        );
        Ok(resource)
    }

    pub async fn get_resource(&self, id: &str) -> AppResult<Resource> {
        self.resources
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource with id '{}' not found", id)))
    }

    pub async fn list_resources(
        &self,
        subject_id: &str,
        published_only: bool,
    ) -> AppResult<Vec<Resource>> {
        if self.subjects.find_by_id(subject_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Subject with id '{}' not found",
                subject_id
            )));
        }
        self.resources
            .list_by_subject(subject_id, published_only)
            .await
    }

    pub async fn update_resource(
        &self,
        id: &str,
        request: UpdateResourceRequest,
    ) -> AppResult<Resource> {
        request.validate()?;

        let mut resource = self.get_resource(id).await?;

        if let Some(resource_type) = request.resource_type {
            if resource.is_quiz() && resource_type != ResourceType::Quiz {
                if let Some(quiz) = self.quizzes.find_by_resource(id).await? {
                    return Err(AppError::ValidationError(format!(
                        "Resource '{}' owns quiz '{}'; it must stay a QUIZ resource",
                        id, quiz.id
                    )));
                }
            }
            resource.resource_type = resource_type;
        }
        if let Some(title) = request.title {
            resource.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            resource.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(is_published) = request.is_published {
            resource.is_published = is_published;
        }

        resource.modified_at = Some(Utc::now());
        self.resources.update(resource).await
    }

    /// Stores `upload` and records it on the resource, replacing any
    /// previously attached file.
    pub async fn attach_file(&self, id: &str, upload: FileUpload) -> AppResult<Resource> {
        let mut resource = self.get_resource(id).await?;
        self.ensure_subject(&resource.subject_id).await?;

        let previous_url = resource.file_url.clone();
        let stored = self.files.store(upload).await?;
        let stored_url = stored.file_url.clone();
        resource.attach_file(stored);

        let resource = match self.resources.update(resource).await {
            Ok(resource) => resource,
            Err(e) => {
                self.discard_stored_file(&stored_url).await;
                return Err(e);
            }
        };

        if let Some(url) = previous_url {
            if let Err(e) = self.files.remove(&url).await {
                log::warn!("Failed to remove replaced file {}: {}", url, e);
            }
        }

        Ok(resource)
    }

    async fn discard_stored_file(&self, url: &str) {
        if let Err(e) = self.files.remove(url).await {
            log::warn!("Failed to remove unrecorded file {}: {}", url, e);
        }
    }

    /// Deletes a resource together with its quiz. Refused while the quiz has
    /// recorded attempts.
    ///
    /// The quiz is closed to submissions before attempts are counted, so no
    /// attempt can land against it once the count comes back empty. If the
    /// resource delete then fails, the quiz is put back as it was.
    pub async fn delete_resource(&self, id: &str) -> AppResult<()> {
        let resource = self.get_resource(id).await?;

        let Some(quiz) = self.quizzes.find_by_resource(id).await? else {
            self.resources.delete(id).await?;
            self.finish_resource_delete(resource).await;
            return Ok(());
        };

        let was_active = quiz.is_active;
        let mut closed = quiz.clone();
        closed.is_active = false;
        self.quizzes.update(closed).await?;

        let counts = DependentCounts {
            attempts: self.attempts.count_by_quiz(&quiz.id).await?,
            ..Default::default()
        };
        if !counts.is_empty() {
            log::warn!("Refusing to delete resource {}: quiz {} has {}", id, quiz.id, counts);
            if was_active {
                self.quizzes.update(quiz).await?;
            }
            return Err(AppError::HasDependents {
                entity: "resource",
                counts,
            });
        }

        self.quizzes.delete(&quiz.id).await?;

        if let Err(e) = self.resources.delete(id).await {
            log::error!(
                "Deleting resource {} failed after its quiz {} was removed; restoring quiz: {}",
                id,
                quiz.id,
                e
            );
            let quiz_id = quiz.id.clone();
            if let Err(restore) = self.quizzes.create(quiz).await {
                log::error!("Failed to restore quiz {}: {}", quiz_id, restore);
            }
            return Err(e);
        }

        log::info!("Deleted quiz {} of resource {}", quiz.id, id);
        self.finish_resource_delete(resource).await;
        Ok(())
    }

    async fn finish_resource_delete(&self, resource: Resource) {
        let id = resource.id;

        if let Some(url) = resource.file_url {
            if let Err(e) = self.files.remove(&url).await {
                log::warn!("Failed to remove file {} of deleted resource {}: {}", url, id, e);
            }
        }

        log::info!("Deleted resource {}", id);
    }
}
