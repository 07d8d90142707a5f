use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AttemptAnswer, Quiz, QuizAttempt},
        dto::response::{AttemptReview, AttemptSummary, PaginatedResponse},
    },
    repositories::{QuizAttemptRepository, QuizRepository},
};

/// Outcome of grading a set of answers against a quiz, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswers {
    pub score: i32,
    pub answers: Vec<GradedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: String,
    pub selected_answer: i32,
    pub is_correct: bool,
    pub marks_awarded: i32,
}

/// Grade submitted answers. Answers keyed by ids that are not questions of
/// this quiz are ignored. Results follow question order.
pub fn grade_answers(quiz: &Quiz, answers: &HashMap<String, i32>) -> GradedAnswers {
    let mut score = 0;
    let mut graded = Vec::with_capacity(answers.len().min(quiz.questions.len()));

    for question in &quiz.questions {
        let Some(&selected_answer) = answers.get(&question.id) else {
            continue;
        };

        let is_correct = question.is_correct(selected_answer);
        let marks_awarded = if is_correct { question.marks } else { 0 };
        score += marks_awarded;

        graded.push(GradedAnswer {
            question_id: question.id.clone(),
            selected_answer,
            is_correct,
            marks_awarded,
        });
    }

    GradedAnswers {
        score,
        answers: graded,
    }
}

/// `score / total_marks * 100`, unrounded. A quiz with no marks yields 0.
pub fn percentage(score: i32, total_marks: i32) -> f64 {
    if total_marks <= 0 {
        return 0.0;
    }
    f64::from(score) * 100.0 / f64::from(total_marks)
}

/// Builds the immutable attempt record for a graded submission.
pub fn build_attempt(quiz: &Quiz, user_id: &str, graded: GradedAnswers, time_spent: i64) -> QuizAttempt {
    let attempt_id = Uuid::new_v4().to_string();
    let passed = quiz.total_marks > 0 && graded.score >= quiz.passing_marks;

    let answers = graded
        .answers
        .into_iter()
        .map(|a| AttemptAnswer {
            id: Uuid::new_v4().to_string(),
            question_id: a.question_id,
            quiz_attempt_id: attempt_id.clone(),
            selected_answer: a.selected_answer,
            is_correct: a.is_correct,
            marks_awarded: a.marks_awarded,
        })
        .collect();

    QuizAttempt {
        id: attempt_id,
        user_id: user_id.to_string(),
        quiz_id: quiz.id.clone(),
        score: graded.score,
        total_marks: quiz.total_marks,
        percentage: percentage(graded.score, quiz.total_marks),
        passed,
        time_spent,
        is_completed: true,
        completed_at: Utc::now(),
        answers,
    }
}

pub struct AttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl AttemptService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    async fn load_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Grades and records one submission. The attempt and its answers are a
    /// single document, so the attempt is either fully recorded or absent.
    pub async fn submit_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        answers: &HashMap<String, i32>,
        time_spent: i64,
    ) -> AppResult<AttemptReview> {
        let quiz = self.load_quiz(quiz_id).await?;

        if !quiz.is_active {
            return Err(AppError::QuizUnavailable(format!(
                "Quiz '{}' is not accepting submissions",
                quiz.id
            )));
        }

        let graded = grade_answers(&quiz, answers);
        let ignored = answers.len().saturating_sub(graded.answers.len());
        if ignored > 0 {
            log::debug!(
                "Ignoring {} answer(s) for unknown questions on quiz {}",
                ignored,
                quiz.id
            );
        }

        let attempt = build_attempt(&quiz, user_id, graded, time_spent.max(0));
        let attempt = self.attempts.create(attempt).await?;

        log::info!(
            "Graded attempt {} for user {} on quiz {}: {}/{} ({:.2}%)",
            attempt.id,
            attempt.user_id,
            attempt.quiz_id,
            attempt.score,
            attempt.total_marks,
            attempt.percentage
        );

        Ok(AttemptReview::new(attempt, quiz))
    }

    /// Review of a finished attempt, visible to its owner only.
    pub async fn get_attempt_review(&self, attempt_id: &str, user_id: &str) -> AppResult<AttemptReview> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        let quiz = self.load_quiz(&attempt.quiz_id).await?;
        Ok(AttemptReview::new(attempt, quiz))
    }

    pub async fn list_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedResponse<AttemptSummary>> {
        let (attempts, total) = self
            .attempts
            .get_user_attempts(user_id, quiz_id, offset, limit)
            .await?;

        Ok(PaginatedResponse {
            items: attempts.into_iter().map(AttemptSummary::from).collect(),
            total,
            offset,
            limit,
        })
    }
}
