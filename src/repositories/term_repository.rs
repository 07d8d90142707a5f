use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    constants::{ID_INDEX, TERMS_COLLECTION, TERM_NAME_INDEX, TERM_ORDER_INDEX},
    db::{duplicate_key_index, index, Database},
    errors::{AppError, AppResult},
    models::domain::Term,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TermRepository: Send + Sync {
    async fn create(&self, term: Term) -> AppResult<Term>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Term>>;
    async fn find_by_order(&self, class_id: &str, order: i32) -> AppResult<Option<Term>>;
    async fn find_by_name(&self, class_id: &str, name: &str) -> AppResult<Option<Term>>;
    /// Terms of a class in ascending `order`.
    async fn list_by_class(&self, class_id: &str) -> AppResult<Vec<Term>>;
    async fn count_by_class(&self, class_id: &str) -> AppResult<u64>;
    async fn update(&self, term: Term) -> AppResult<Term>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoTermRepository {
    collection: Collection<Term>,
}

impl MongoTermRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(TERMS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for terms collection");

        self.collection
            .create_index(index(doc! { "id": 1 }, ID_INDEX, true))
            .await?;
        self.collection
            .create_index(index(
                doc! { "class_id": 1, "order": 1 },
                TERM_ORDER_INDEX,
                true,
            ))
            .await?;
        self.collection
            .create_index(index(
                doc! { "class_id": 1, "name": 1 },
                TERM_NAME_INDEX,
                true,
            ))
            .await?;

        log::info!("Successfully created indexes for terms collection");
        Ok(())
    }
}

fn map_write_error(err: mongodb::error::Error, term: &Term) -> AppError {
    match duplicate_key_index(&err).as_deref() {
        Some(TERM_ORDER_INDEX) => AppError::DuplicateOrder {
            entity: "term",
            order: term.order,
        },
        Some(TERM_NAME_INDEX) => AppError::DuplicateName {
            entity: "term",
            name: term.name.clone(),
        },
        Some(_) => AppError::AlreadyExists(format!("Term with id '{}' already exists", term.id)),
        None => err.into(),
    }
}

#[async_trait]
impl TermRepository for MongoTermRepository {
    async fn create(&self, term: Term) -> AppResult<Term> {
        self.collection
            .insert_one(&term)
            .await
            .map_err(|e| map_write_error(e, &term))?;
        Ok(term)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Term>> {
        let term = self.collection.find_one(doc! { "id": id }).await?;
        Ok(term)
    }

    async fn find_by_order(&self, class_id: &str, order: i32) -> AppResult<Option<Term>> {
        let term = self
            .collection
            .find_one(doc! { "class_id": class_id, "order": order })
            .await?;
        Ok(term)
    }

    async fn find_by_name(&self, class_id: &str, name: &str) -> AppResult<Option<Term>> {
        let term = self
            .collection
            .find_one(doc! { "class_id": class_id, "name": name })
            .await?;
        Ok(term)
    }

    async fn list_by_class(&self, class_id: &str) -> AppResult<Vec<Term>> {
        let terms = self
            .collection
            .find(doc! { "class_id": class_id })
            .sort(doc! { "order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(terms)
    }

    async fn count_by_class(&self, class_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "class_id": class_id })
            .await?;
        Ok(count)
    }

    async fn update(&self, term: Term) -> AppResult<Term> {
        let result = self
            .collection
            .replace_one(doc! { "id": &term.id }, &term)
            .await
            .map_err(|e| map_write_error(e, &term))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Term with id '{}' not found",
                term.id
            )));
        }

        Ok(term)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Term with id '{}' not found", id)));
        }

        Ok(())
    }
}
