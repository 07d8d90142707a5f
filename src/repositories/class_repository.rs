use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{CLASSES_COLLECTION, CLASS_NAME_INDEX, CLASS_ORDER_INDEX, ID_INDEX},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::Class,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: Class) -> AppResult<Class>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Class>>;
    async fn find_by_order(&self, order: i32) -> AppResult<Option<Class>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Class>>;
    /// All classes in ascending `order`.
    async fn list(&self) -> AppResult<Vec<Class>>;
    async fn update(&self, class: Class) -> AppResult<Class>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoClassRepository {
    collection: Collection<Class>,
}

impl MongoClassRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(CLASSES_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for classes collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(doc! { "order": 1 }, CLASS_ORDER_INDEX, true))
            .await?;
        self.collection
            .create_index(index(doc! { "name": 1 }, CLASS_NAME_INDEX, true))
            .await?;

        log::info!("Successfully created indexes for classes collection");
        Ok(())
    }
}

fn map_write_error(err: mongodb::error::Error, class: &Class) -> AppError {
    match duplicate_key_index(&err).as_deref() {
        Some(CLASS_ORDER_INDEX) => AppError::DuplicateOrder {
            entity: "class",
            order: class.order,
        },
        Some(CLASS_NAME_INDEX) => AppError::DuplicateName {
            entity: "class",
            name: class.name.clone(),
        },
        Some(_) => AppError::AlreadyExists(format!("Class with id '{}' already exists", class.id)),
        None => err.into(),
    }
}

#[async_trait]
impl ClassRepository for MongoClassRepository {
    async fn create(&self, class: Class) -> AppResult<Class> {
        self.collection
            .insert_one(&class)
            .await
            .map_err(|e| map_write_error(e, &class))?;
        Ok(class)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Class>> {
        let class = self.collection.find_one(doc! { "id": id }).await?;
        Ok(class)
    }

    async fn find_by_order(&self, order: i32) -> AppResult<Option<Class>> {
        let class = self.collection.find_one(doc! { "order": order }).await?;
        Ok(class)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Class>> {
        let class = self.collection.find_one(doc! { "name": name }).await?;
        Ok(class)
    }

    async fn list(&self) -> AppResult<Vec<Class>> {
        let classes = self
            .collection
            .find(doc! {})
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(classes)
    }

    async fn update(&self, class: Class) -> AppResult<Class> {
        let result = self
            .collection
            .replace_one(doc! { "id": &class.id }, &class)
            .await
            .map_err(|e| map_write_error(e, &class))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Class with id '{}' not found",
                class.id
            )));
        }

        Ok(class)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Class with id '{}' not found", id)));
        }

        Ok(())
    }
}
