use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{ID_INDEX, RESOURCES_COLLECTION},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::Resource,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: Resource) -> AppResult<Resource>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Resource>>;
    /// Resources of a subject, oldest first.
    async fn list_by_subject(
        &self,
        subject_id: &str,
        published_only: bool,
    ) -> AppResult<Vec<Resource>>;
    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64>;
    async fn update(&self, resource: Resource) -> AppResult<Resource>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoResourceRepository {
    collection: Collection<Resource>,
}

impl MongoResourceRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(RESOURCES_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for resources collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(doc! { "subject_id": 1 }, "subject_id", false))
            .await?;

        log::info!("Successfully created indexes for resources collection");
        Ok(())
    }
}

#[async_trait]
impl ResourceRepository for MongoResourceRepository {
    async fn create(&self, resource: Resource) -> AppResult<Resource> {
        self.collection.insert_one(&resource).await.map_err(|e| {
            if duplicate_key_index(&e).is_some() {
                AppError::AlreadyExists(format!(
                    "Resource with id '{}' already exists",
                    resource.id
                ))
            } else {
                e.into()
            }
        })?;
        Ok(resource)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Resource>> {
        let resource = self.collection.find_one(doc! { "id": id }).await?;
        Ok(resource)
    }

    async fn list_by_subject(
        &self,
        subject_id: &str,
        published_only: bool,
    ) -> AppResult<Vec<Resource>> {
        let mut filter = doc! { "subject_id": subject_id };
        if published_only {
            filter.insert("is_published", true);
        }

        let resources = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1, "title": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(resources)
    }

    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "subject_id": subject_id })
            .await?;
        Ok(count)
    }

    async fn update(&self, resource: Resource) -> AppResult<Resource> {
        let result = self
            .collection
            .replace_one(doc! { "id": &resource.id }, &resource)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Resource with id '{}' not found",
                resource.id
            )));
        }

        Ok(resource)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Resource with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}
