use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizQuestion},
        dto::{
            request::{CreateQuizRequest, UpdateQuizSettingsRequest},
            response::{QuizAuthoringView, QuizTakingView},
        },
    },
    repositories::{QuizRepository, ResourceRepository},
};

pub struct QuizService {
    resources: Arc<dyn ResourceRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(resources: Arc<dyn ResourceRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { resources, quizzes }
    }

    async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    /// Attaches a quiz to a `QUIZ` resource. Questions take their order from
    /// their position in the request; correct options arrive 0-based.
    pub async fn create_quiz(
        &self,
        resource_id: &str,
        request: CreateQuizRequest,
        created_by: &str,
    ) -> AppResult<QuizAuthoringView> {
        request.validate()?;

        let resource = self
            .resources
            .find_by_id(resource_id)
            .await?
            .ok_or_else(|| AppError::UnknownReference {
                entity: "resource",
                id: resource_id.to_string(),
            })?;

        if !resource.is_quiz() {
            return Err(AppError::ValidationError(format!(
                "Resource '{}' is a {:?} resource; quizzes attach to QUIZ resources only",
                resource_id, resource.resource_type
            )));
        }

        if self.quizzes.find_by_resource(resource_id).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Resource '{}' already has a quiz",
                resource_id
            )));
        }

        let questions = request
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                QuizQuestion::new(
                    q.text.trim(),
                    q.options.clone(),
                    q.correct_option_index,
                    q.explanation.as_deref(),
                    i as i32 + 1,
                )
            })
            .collect::<AppResult<Vec<_>>>()?;

        let quiz = Quiz::new(
            resource_id,
            &resource.title,
            request.duration_minutes,
            request.difficulty.unwrap_or_default(),
            request.is_active.unwrap_or(true),
            questions,
            created_by,
        );
        let quiz = self.quizzes.create(quiz).await?;

        log::info!(
            "Created quiz {} for resource {} with {} question(s), passing at {}",
            quiz.id,
            resource_id,
            quiz.total_marks,
            quiz.passing_marks
        );

        QuizAuthoringView::try_from_quiz(quiz)
    }

    pub async fn get_quiz_for_taking(&self, id: &str) -> AppResult<QuizTakingView> {
        Ok(self.get_quiz(id).await?.into())
    }

    pub async fn get_quiz_for_authoring(&self, id: &str) -> AppResult<QuizAuthoringView> {
        QuizAuthoringView::try_from_quiz(self.get_quiz(id).await?)
    }

    pub async fn get_quiz_by_resource(&self, resource_id: &str) -> AppResult<QuizTakingView> {
        let quiz = self
            .quizzes
            .find_by_resource(resource_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No quiz found for resource '{}'", resource_id))
            })?;
        Ok(quiz.into())
    }

    /// Questions, and with them the marks, are fixed once a quiz exists.
    pub async fn update_quiz_settings(
        &self,
        id: &str,
        request: UpdateQuizSettingsRequest,
    ) -> AppResult<QuizAuthoringView> {
        request.validate()?;

        let mut quiz = self.get_quiz(id).await?;

        if let Some(duration) = request.duration_minutes {
            quiz.duration_minutes = duration;
        }
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }

        quiz.modified_at = Some(Utc::now());
        let quiz = self.quizzes.update(quiz).await?;
        QuizAuthoringView::try_from_quiz(quiz)
    }
}
