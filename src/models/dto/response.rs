use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    constants::OPTION_COUNT,
    errors::AppResult,
    models::domain::{
        quiz_question::stored_to_authored_index, AttemptAnswer, Difficulty, Quiz, QuizAttempt,
        QuizQuestion,
    },
};

/// Percentages are stored exactly and shown to two decimals.
fn display_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A quiz as shown to a learner before submitting. Correct answers and
/// explanations are deliberately absent from this type.
#[derive(Debug, Clone, Serialize)]
pub struct QuizTakingView {
    pub id: String,
    pub resource_id: String,
    pub title: String,
    pub duration_minutes: i32,
    pub difficulty: Difficulty,
    pub total_marks: i32,
    pub passing_marks: i32,
    pub is_active: bool,
    pub questions: Vec<TakingQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakingQuestion {
    pub id: String,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub order: i32,
    pub marks: i32,
}

impl From<Quiz> for QuizTakingView {
    fn from(quiz: Quiz) -> Self {
        QuizTakingView {
            id: quiz.id,
            resource_id: quiz.resource_id,
            title: quiz.title,
            duration_minutes: quiz.duration_minutes,
            difficulty: quiz.difficulty,
            total_marks: quiz.total_marks,
            passing_marks: quiz.passing_marks,
            is_active: quiz.is_active,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| TakingQuestion {
                    id: q.id,
                    text: q.text,
                    options: q.options,
                    order: q.order,
                    marks: q.marks,
                })
                .collect(),
        }
    }
}

/// A quiz handed back to an authoring client, with 0-based correct indices.
#[derive(Debug, Clone, Serialize)]
pub struct QuizAuthoringView {
    pub id: String,
    pub resource_id: String,
    pub title: String,
    pub duration_minutes: i32,
    pub difficulty: Difficulty,
    pub total_marks: i32,
    pub passing_marks: i32,
    pub is_active: bool,
    pub questions: Vec<AuthoringQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthoringQuestion {
    pub id: String,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option_index: usize,
    pub explanation: Option<String>,
    pub order: i32,
}

impl QuizAuthoringView {
    pub fn try_from_quiz(quiz: Quiz) -> AppResult<Self> {
        let questions = quiz
            .questions
            .into_iter()
            .map(|q| {
                Ok(AuthoringQuestion {
                    correct_option_index: stored_to_authored_index(q.correct_answer)?,
                    id: q.id,
                    text: q.text,
                    options: q.options,
                    explanation: q.explanation,
                    order: q.order,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(QuizAuthoringView {
            id: quiz.id,
            resource_id: quiz.resource_id,
            title: quiz.title,
            duration_minutes: quiz.duration_minutes,
            difficulty: quiz.difficulty,
            total_marks: quiz.total_marks,
            passing_marks: quiz.passing_marks,
            is_active: quiz.is_active,
            questions,
        })
    }
}

/// The graded result of a submission, with the quiz's answers and
/// explanations for review.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReview {
    pub attempt_id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub passed: bool,
    pub time_spent: i64,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<AnswerResult>,
    pub quiz: ReviewQuiz,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub question_id: String,
    pub selected_answer: i32,
    pub is_correct: bool,
    pub marks_awarded: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewQuiz {
    pub id: String,
    pub title: String,
    pub passing_marks: i32,
    pub questions: Vec<ReviewQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewQuestion {
    pub id: String,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub order: i32,
    pub correct_answer: i32,
    pub explanation: Option<String>,
}

impl From<AttemptAnswer> for AnswerResult {
    fn from(answer: AttemptAnswer) -> Self {
        AnswerResult {
            question_id: answer.question_id,
            selected_answer: answer.selected_answer,
            is_correct: answer.is_correct,
            marks_awarded: answer.marks_awarded,
        }
    }
}

impl From<QuizQuestion> for ReviewQuestion {
    fn from(question: QuizQuestion) -> Self {
        ReviewQuestion {
            id: question.id,
            text: question.text,
            options: question.options,
            order: question.order,
            correct_answer: question.correct_answer,
            explanation: question.explanation,
        }
    }
}

impl AttemptReview {
    pub fn new(attempt: QuizAttempt, quiz: Quiz) -> Self {
        AttemptReview {
            attempt_id: attempt.id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: display_percentage(attempt.percentage),
            passed: attempt.passed,
            time_spent: attempt.time_spent,
            completed_at: attempt.completed_at,
            answers: attempt.answers.into_iter().map(AnswerResult::from).collect(),
            quiz: ReviewQuiz {
                id: quiz.id,
                title: quiz.title,
                passing_marks: quiz.passing_marks,
                questions: quiz.questions.into_iter().map(ReviewQuestion::from).collect(),
            },
        }
    }
}

/// Attempt history entry without per-question detail.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummary {
    pub attempt_id: String,
    pub quiz_id: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub passed: bool,
    pub time_spent: i64,
    pub completed_at: DateTime<Utc>,
}

impl From<QuizAttempt> for AttemptSummary {
    fn from(attempt: QuizAttempt) -> Self {
        AttemptSummary {
            attempt_id: attempt.id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: display_percentage(attempt.percentage),
            passed: attempt.passed,
            time_spent: attempt.time_spent,
            completed_at: attempt.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
