use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::DependentCounts;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate order: another {entity} already holds order {order}")]
    DuplicateOrder { entity: &'static str, order: i32 },

    #[error("Duplicate name: another {entity} is already named '{name}'")]
    DuplicateName { entity: &'static str, name: String },

    #[error("Duplicate code: subject code '{code}' is already used in this term")]
    DuplicateCode { code: String },

    #[error("Cannot delete {entity}: it still owns {counts}")]
    HasDependents {
        entity: &'static str,
        counts: DependentCounts,
    },

    #[error("Unknown subject: '{0}'")]
    UnknownSubject(String),

    #[error("Unknown {entity}: '{id}'")]
    UnknownReference { entity: &'static str, id: String },

    #[error("Quiz unavailable: {0}")]
    QuizUnavailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DuplicateOrder { .. } => "DUPLICATE_ORDER",
            AppError::DuplicateName { .. } => "DUPLICATE_NAME",
            AppError::DuplicateCode { .. } => "DUPLICATE_CODE",
            AppError::HasDependents { .. } => "HAS_DEPENDENTS",
            AppError::UnknownSubject(_) => "UNKNOWN_SUBJECT",
            AppError::UnknownReference { .. } => "UNKNOWN_REFERENCE",
            AppError::QuizUnavailable(_) => "QUIZ_UNAVAILABLE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Structural and dependent-entity conflicts are rejected mutations the
    /// caller has to resolve by choosing different values.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AppError::AlreadyExists(_)
                | AppError::DuplicateOrder { .. }
                | AppError::DuplicateName { .. }
                | AppError::DuplicateCode { .. }
                | AppError::HasDependents { .. }
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependents: Option<DependentCounts>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_)
            | AppError::DuplicateOrder { .. }
            | AppError::DuplicateName { .. }
            | AppError::DuplicateCode { .. }
            | AppError::HasDependents { .. } => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownSubject(_) | AppError::UnknownReference { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::QuizUnavailable(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_conflict() {
            log::debug!("Rejected mutation: {}", self);
        } else if self.status_code().is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let dependents = match self {
            AppError::HasDependents { counts, .. } => Some(counts.clone()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.kind(),
            dependents,
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DuplicateOrder {
                entity: "class",
                order: 3
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownSubject("s-1".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("class".into());
        assert_eq!(err.to_string(), "Not found: class");

        let err = AppError::DuplicateCode {
            code: "MATH-6".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate code: subject code 'MATH-6' is already used in this term"
        );
    }

    #[test]
    fn has_dependents_response_carries_counts() {
        let err = AppError::HasDependents {
            entity: "term",
            counts: DependentCounts {
                subjects: 2,
                ..Default::default()
            },
        };
        assert!(err.is_conflict());

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = response.into_body().try_into_bytes().expect("body is in memory");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["kind"], "HAS_DEPENDENTS");
        assert_eq!(json["dependents"]["subjects"], 2);
    }
}
