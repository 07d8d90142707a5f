use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ClassRepository, MongoClassRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoResourceRepository, MongoSubjectRepository, MongoTermRepository, MongoUserRepository,
        QuizAttemptRepository, QuizRepository, ResourceRepository, SubjectRepository,
        TermRepository, UserRepository,
    },
    services::{
        AttemptService, CatalogService, FileStore, LocalFileStore, QuizService, ResourceService,
    },
};

/// One repository per aggregate. Services only ever see these traits.
#[derive(Clone)]
pub struct Repositories {
    pub classes: Arc<dyn ClassRepository>,
    pub terms: Arc<dyn TermRepository>,
    pub subjects: Arc<dyn SubjectRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// MongoDB-backed repositories with their unique indexes in place.
    pub async fn mongo(db: &Database) -> AppResult<Self> {
        let classes = MongoClassRepository::new(db);
        classes.ensure_indexes().await?;
        let terms = MongoTermRepository::new(db);
        terms.ensure_indexes().await?;
        let subjects = MongoSubjectRepository::new(db);
        subjects.ensure_indexes().await?;
        let resources = MongoResourceRepository::new(db);
        resources.ensure_indexes().await?;
        let quizzes = MongoQuizRepository::new(db);
        quizzes.ensure_indexes().await?;
        let attempts = MongoQuizAttemptRepository::new(db);
        attempts.ensure_indexes().await?;
        let users = MongoUserRepository::new(db);
        users.ensure_indexes().await?;

        Ok(Self {
            classes: Arc::new(classes),
            terms: Arc::new(terms),
            subjects: Arc::new(subjects),
            resources: Arc::new(resources),
            quizzes: Arc::new(quizzes),
            attempts: Arc::new(attempts),
            users: Arc::new(users),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub resource_service: Arc<ResourceService>,
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<AttemptService>,
    pub config: Arc<Config>,
    /// Absent when the state is built over non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let repositories = Repositories::mongo(&db).await?;
        let file_store = Arc::new(LocalFileStore::from_config(&config));

        Ok(Self::from_repositories(repositories, file_store, config, Some(db)))
    }

    pub fn from_repositories(
        repositories: Repositories,
        file_store: Arc<dyn FileStore>,
        config: Config,
        db: Option<Database>,
    ) -> Self {
        let Repositories {
            classes,
            terms,
            subjects,
            resources,
            quizzes,
            attempts,
            users,
        } = repositories;

        let catalog_service = Arc::new(CatalogService::new(
            classes,
            terms,
            subjects.clone(),
            resources.clone(),
            users,
        ));
        let resource_service = Arc::new(ResourceService::new(
            subjects,
            resources.clone(),
            quizzes.clone(),
            attempts.clone(),
            file_store,
        ));
        let quiz_service = Arc::new(QuizService::new(resources, quizzes.clone()));
        let attempt_service = Arc::new(AttemptService::new(quizzes, attempts));

        Self {
            catalog_service,
            resource_service,
            quiz_service,
            attempt_service,
            config: Arc::new(config),
            db,
        }
    }
}
