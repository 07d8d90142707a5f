use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{ID_INDEX, SUBJECTS_COLLECTION, SUBJECT_CODE_INDEX},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::Subject,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, subject: Subject) -> AppResult<Subject>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>>;
    async fn find_by_code(&self, term_id: &str, code: &str) -> AppResult<Option<Subject>>;
    /// Subjects of a term ordered by `order`, then `name`.
    async fn list_by_term(&self, term_id: &str) -> AppResult<Vec<Subject>>;
    async fn count_by_term(&self, term_id: &str) -> AppResult<u64>;
    async fn count_by_terms(&self, term_ids: &[String]) -> AppResult<u64>;
    async fn update(&self, subject: Subject) -> AppResult<Subject>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoSubjectRepository {
    collection: Collection<Subject>,
}

impl MongoSubjectRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(SUBJECTS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for subjects collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "term_id": 1, "code": 1 },
                SUBJECT_CODE_INDEX,
                true,
            ))
            .await?;

        log::info!("Successfully created indexes for subjects collection");
        Ok(())
    }
}

fn map_write_error(err: mongodb::error::Error, subject: &Subject) -> AppError {
    match duplicate_key_index(&err).as_deref() {
        Some(SUBJECT_CODE_INDEX) => AppError::DuplicateCode {
            code: subject.code.clone(),
        },
        Some(_) => AppError::AlreadyExists(format!(
            "Subject with id '{}' already exists",
            subject.id
        )),
        None => err.into(),
    }
}

#[async_trait]
impl SubjectRepository for MongoSubjectRepository {
    async fn create(&self, subject: Subject) -> AppResult<Subject> {
        self.collection
            .insert_one(&subject)
            .await
            .map_err(|e| map_write_error(e, &subject))?;
        Ok(subject)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>> {
        let subject = self.collection.find_one(doc! { "id": id }).await?;
        Ok(subject)
    }

    async fn find_by_code(&self, term_id: &str, code: &str) -> AppResult<Option<Subject>> {
        let subject = self
            .collection
            .find_one(doc! { "term_id": term_id, "code": code })
            .await?;
        Ok(subject)
    }

    async fn list_by_term(&self, term_id: &str) -> AppResult<Vec<Subject>> {
        let subjects = self
            .collection
            .find(doc! { "term_id": term_id })
            .sort(doc! { "order": 1, "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(subjects)
    }

    async fn count_by_term(&self, term_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "term_id": term_id })
            .await?;
        Ok(count)
    }

    async fn count_by_terms(&self, term_ids: &[String]) -> AppResult<u64> {
        if term_ids.is_empty() {
            return Ok(0);
        }

        let count = self
            .collection
            .count_documents(doc! { "term_id": { "$in": term_ids.to_vec() } })
            .await?;
        Ok(count)
    }

    async fn update(&self, subject: Subject) -> AppResult<Subject> {
        let result = self
            .collection
            .replace_one(doc! { "id": &subject.id }, &subject)
            .await
            .map_err(|e| map_write_error(e, &subject))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Subject with id '{}' not found",
                subject.id
            )));
        }

        Ok(subject)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Subject with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
