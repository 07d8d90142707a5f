use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::HeaderMap, FromRequest, HttpRequest};

use crate::{errors::AppError, models::domain::UserRole};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller as vouched for by the identity collaborator in front of this
/// service. Authorization has already happened upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
    pub role: UserRole,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl CallerIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let user_id = header_value(headers, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing caller identity".to_string()))?;

        let role = header_value(headers, USER_ROLE_HEADER)
            .and_then(UserRole::parse)
            .unwrap_or_default();

        Ok(CallerIdentity {
            user_id: user_id.to_string(),
            role,
        })
    }

    pub fn is_author(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Teacher)
    }
}

/// Correct answers leave the service only through authoring views or
/// post-submission reviews.
pub fn require_author(caller: &CallerIdentity) -> Result<(), AppError> {
    if !caller.is_author() {
        return Err(AppError::Unauthorized(
            "Only teachers and administrators can view quiz answers".to_string(),
        ));
    }
    Ok(())
}

impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(CallerIdentity::from_headers(req.headers()))
    }
}
