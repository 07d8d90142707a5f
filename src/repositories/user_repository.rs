use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{ID_INDEX, USERS_COLLECTION},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::User,
};

/// Read access to the users written by the identity collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn count_by_class(&self, class_id: &str) -> AppResult<u64>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(USERS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(doc! { "username": 1 }, "username_unique", true))
            .await?;
        self.collection
            .create_index(index(doc! { "class_id": 1 }, "class_id", false))
            .await?;

        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection.insert_one(&user).await.map_err(|e| {
            if duplicate_key_index(&e).is_some() {
                AppError::AlreadyExists(format!(
                    "User with username '{}' already exists",
                    user.username
                ))
            } else {
                e.into()
            }
        })?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn count_by_class(&self, class_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "class_id": class_id })
            .await?;
        Ok(count)
    }
}
