#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use schoolhub_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Class, Quiz, QuizAttempt, Resource, Subject, Term, User},
    repositories::{
        ClassRepository, QuizAttemptRepository, QuizRepository, ResourceRepository,
        SubjectRepository, TermRepository, UserRepository,
    },
    services::LocalFileStore,
};

// Every write checks its unique keys and inserts under one write lock, the
// same guarantee the MongoDB unique indexes give.

#[derive(Default)]
pub struct InMemoryClassRepository {
    classes: RwLock<HashMap<String, Class>>,
}

fn class_conflict(existing: &HashMap<String, Class>, class: &Class) -> Option<AppError> {
    existing.values().filter(|c| c.id != class.id).find_map(|c| {
        if c.order == class.order {
            Some(AppError::DuplicateOrder {
                entity: "class",
                order: class.order,
            })
        } else if c.name == class.name {
            Some(AppError::DuplicateName {
                entity: "class",
                name: class.name.clone(),
            })
        } else {
            None
        }
    })
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn create(&self, class: Class) -> AppResult<Class> {
        let mut classes = self.classes.write().await;
        if classes.contains_key(&class.id) {
            return Err(AppError::AlreadyExists(format!(
                "Class with id '{}' already exists",
                class.id
            )));
        }
        if let Some(err) = class_conflict(&classes, &class) {
            return Err(err);
        }
        classes.insert(class.id.clone(), class.clone());
        Ok(class)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Class>> {
        Ok(self.classes.read().await.get(id).cloned())
    }

    async fn find_by_order(&self, order: i32) -> AppResult<Option<Class>> {
        let classes = self.classes.read().await;
        Ok(classes.values().find(|c| c.order == order).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Class>> {
        let classes = self.classes.read().await;
        Ok(classes.values().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Class>> {
        let mut items: Vec<_> = self.classes.read().await.values().cloned().collect();
        items.sort_by_key(|c| c.order);
        Ok(items)
    }

    async fn update(&self, class: Class) -> AppResult<Class> {
        let mut classes = self.classes.write().await;
        if !classes.contains_key(&class.id) {
            return Err(AppError::NotFound(format!(
                "Class with id '{}' not found",
                class.id
            )));
        }
        if let Some(err) = class_conflict(&classes, &class) {
            return Err(err);
        }
        classes.insert(class.id.clone(), class.clone());
        Ok(class)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.classes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))
    }
}

#[derive(Default)]
pub struct InMemoryTermRepository {
    terms: RwLock<HashMap<String, Term>>,
}

fn term_conflict(existing: &HashMap<String, Term>, term: &Term) -> Option<AppError> {
    existing
        .values()
        .filter(|t| t.id != term.id && t.class_id == term.class_id)
        .find_map(|t| {
            if t.order == term.order {
                Some(AppError::DuplicateOrder {
                    entity: "term",
                    order: term.order,
                })
            } else if t.name == term.name {
                Some(AppError::DuplicateName {
                    entity: "term",
                    name: term.name.clone(),
                })
            } else {
                None
            }
        })
}

#[async_trait]
impl TermRepository for InMemoryTermRepository {
    async fn create(&self, term: Term) -> AppResult<Term> {
        let mut terms = self.terms.write().await;
        if let Some(err) = term_conflict(&terms, &term) {
            return Err(err);
        }
        terms.insert(term.id.clone(), term.clone());
        Ok(term)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Term>> {
        Ok(self.terms.read().await.get(id).cloned())
    }

    async fn find_by_order(&self, class_id: &str, order: i32) -> AppResult<Option<Term>> {
        let terms = self.terms.read().await;
        Ok(terms
            .values()
            .find(|t| t.class_id == class_id && t.order == order)
            .cloned())
    }

    async fn find_by_name(&self, class_id: &str, name: &str) -> AppResult<Option<Term>> {
        let terms = self.terms.read().await;
        Ok(terms
            .values()
            .find(|t| t.class_id == class_id && t.name == name)
            .cloned())
    }

    async fn list_by_class(&self, class_id: &str) -> AppResult<Vec<Term>> {
        let terms = self.terms.read().await;
        let mut items: Vec<_> = terms
            .values()
            .filter(|t| t.class_id == class_id)
            .cloned()
            .collect();
        items.sort_by_key(|t| t.order);
        Ok(items)
    }

    async fn count_by_class(&self, class_id: &str) -> AppResult<u64> {
        let terms = self.terms.read().await;
        Ok(terms.values().filter(|t| t.class_id == class_id).count() as u64)
    }

    async fn update(&self, term: Term) -> AppResult<Term> {
        let mut terms = self.terms.write().await;
        if !terms.contains_key(&term.id) {
            return Err(AppError::NotFound(format!("Term with id '{}' not found", term.id)));
        }
        if let Some(err) = term_conflict(&terms, &term) {
            return Err(err);
        }
        terms.insert(term.id.clone(), term.clone());
        Ok(term)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.terms
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Term with id '{}' not found", id)))
    }
}

#[derive(Default)]
pub struct InMemorySubjectRepository {
    subjects: RwLock<HashMap<String, Subject>>,
}

fn subject_conflict(existing: &HashMap<String, Subject>, subject: &Subject) -> Option<AppError> {
    existing
        .values()
        .any(|s| s.id != subject.id && s.term_id == subject.term_id && s.code == subject.code)
        .then(|| AppError::DuplicateCode {
            code: subject.code.clone(),
        })
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn create(&self, subject: Subject) -> AppResult<Subject> {
        let mut subjects = self.subjects.write().await;
        if let Some(err) = subject_conflict(&subjects, &subject) {
            return Err(err);
        }
        subjects.insert(subject.id.clone(), subject.clone());
        Ok(subject)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>> {
        Ok(self.subjects.read().await.get(id).cloned())
    }

    async fn find_by_code(&self, term_id: &str, code: &str) -> AppResult<Option<Subject>> {
        let subjects = self.subjects.read().await;
        Ok(subjects
            .values()
            .find(|s| s.term_id == term_id && s.code == code)
            .cloned())
    }

    async fn list_by_term(&self, term_id: &str) -> AppResult<Vec<Subject>> {
        let subjects = self.subjects.read().await;
        let mut items: Vec<_> = subjects
            .values()
            .filter(|s| s.term_id == term_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn count_by_term(&self, term_id: &str) -> AppResult<u64> {
        let subjects = self.subjects.read().await;
        Ok(subjects.values().filter(|s| s.term_id == term_id).count() as u64)
    }

    async fn count_by_terms(&self, term_ids: &[String]) -> AppResult<u64> {
        let subjects = self.subjects.read().await;
        Ok(subjects
            .values()
            .filter(|s| term_ids.contains(&s.term_id))
            .count() as u64)
    }

    async fn update(&self, subject: Subject) -> AppResult<Subject> {
        let mut subjects = self.subjects.write().await;
        if !subjects.contains_key(&subject.id) {
            return Err(AppError::NotFound(format!(
                "Subject with id '{}' not found",
                subject.id
            )));
        }
        if let Some(err) = subject_conflict(&subjects, &subject) {
            return Err(err);
        }
        subjects.insert(subject.id.clone(), subject.clone());
        Ok(subject)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.subjects
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Subject with id '{}' not found", id)))
    }
}

#[derive(Default)]
pub struct InMemoryResourceRepository {
    resources: RwLock<HashMap<String, Resource>>,
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn create(&self, resource: Resource) -> AppResult<Resource> {
        let mut resources = self.resources.write().await;
        if resources.contains_key(&resource.id) {
            return Err(AppError::AlreadyExists(format!(
                "Resource with id '{}' already exists",
                resource.id
            )));
        }
        resources.insert(resource.id.clone(), resource.clone());
        Ok(resource)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Resource>> {
        Ok(self.resources.read().await.get(id).cloned())
    }

    async fn list_by_subject(
        &self,
        subject_id: &str,
        published_only: bool,
    ) -> AppResult<Vec<Resource>> {
        let resources = self.resources.read().await;
        let mut items: Vec<_> = resources
            .values()
            .filter(|r| r.subject_id == subject_id && (!published_only || r.is_published))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(items)
    }

    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64> {
        let resources = self.resources.read().await;
        Ok(resources
            .values()
            .filter(|r| r.subject_id == subject_id)
            .count() as u64)
    }

    async fn update(&self, resource: Resource) -> AppResult<Resource> {
        let mut resources = self.resources.write().await;
        if !resources.contains_key(&resource.id) {
            return Err(AppError::NotFound(format!(
                "Resource with id '{}' not found",
                resource.id
            )));
        }
        resources.insert(resource.id.clone(), resource.clone());
        Ok(resource)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.resources
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Resource with id '{}' not found", id)))
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes
            .values()
            .any(|q| q.id == quiz.id || q.resource_id == quiz.resource_id)
        {
            return Err(AppError::AlreadyExists(format!(
                "Resource '{}' already has a quiz",
                quiz.resource_id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_resource(&self, resource_id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .values()
            .find(|q| q.resource_id == resource_id)
            .cloned())
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.quizzes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<HashMap<String, QuizAttempt>>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts.contains_key(&attempt.id) {
            return Err(AppError::AlreadyExists(format!(
                "Attempt with id '{}' already exists",
                attempt.id
            )));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(id).cloned())
    }

    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let attempts = self.attempts.read().await;
        Ok(attempts.values().filter(|a| a.quiz_id == quiz_id).count() as u64)
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .filter(|a| quiz_id.as_deref().map_or(true, |qid| a.quiz_id == qid))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn count_by_class(&self, class_id: &str) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.class_id.as_deref() == Some(class_id))
            .count() as u64)
    }
}

pub fn in_memory_repositories() -> Repositories {
    Repositories {
        classes: Arc::new(InMemoryClassRepository::default()),
        terms: Arc::new(InMemoryTermRepository::default()),
        subjects: Arc::new(InMemorySubjectRepository::default()),
        resources: Arc::new(InMemoryResourceRepository::default()),
        quizzes: Arc::new(InMemoryQuizRepository::default()),
        attempts: Arc::new(InMemoryQuizAttemptRepository::default()),
        users: Arc::new(InMemoryUserRepository::default()),
    }
}

pub fn test_config() -> Config {
    let upload_dir = std::env::temp_dir().join(format!("schoolhub-it-{}", uuid::Uuid::new_v4()));

    Config {
        mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
        mongo_db_name: "schoolhub-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        upload_public_prefix: "/uploads".to_string(),
        max_upload_bytes: 4096,
        app_env: "test".to_string(),
    }
}

/// Application state over fresh in-memory repositories. The repositories are
/// returned too so tests can seed data the service layer does not create.
pub fn test_state() -> (AppState, Repositories) {
    let repositories = in_memory_repositories();
    let config = test_config();
    let file_store = Arc::new(LocalFileStore::from_config(&config));

    let state = AppState::from_repositories(repositories.clone(), file_store, config, None);
    (state, repositories)
}
