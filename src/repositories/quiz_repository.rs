use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{ID_INDEX, QUIZZES_COLLECTION, QUIZ_RESOURCE_INDEX},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the resource already owns a quiz.
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_resource(&self, resource_id: &str) -> AppResult<Option<Quiz>>;
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(QUIZZES_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "resource_id": 1 },
                QUIZ_RESOURCE_INDEX,
                true,
            ))
            .await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await.map_err(|e| {
            match duplicate_key_index(&e).as_deref() {
                Some(QUIZ_RESOURCE_INDEX) => AppError::AlreadyExists(format!(
                    "Resource '{}' already has a quiz",
                    quiz.resource_id
                )),
                Some(_) => {
                    AppError::AlreadyExists(format!("Quiz with id '{}' already exists", quiz.id))
                }
                None => e.into(),
            }
        })?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_by_resource(&self, resource_id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "resource_id": resource_id })
            .await?;
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .collection
            .replace_one(doc! { "id": &quiz.id }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }

        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }

        Ok(())
    }
}
