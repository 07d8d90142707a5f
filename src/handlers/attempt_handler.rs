use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    identity::CallerIdentity,
    models::dto::request::{PaginationParams, SubmitAttemptRequest},
};

#[post("/api/quizzes/{id}/attempts")]
async fn submit_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let request = request.into_inner();

    let review = state
        .attempt_service
        .submit_attempt(&quiz_id, &caller.user_id, &request.answers, request.time_spent)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let review = state
        .attempt_service
        .get_attempt_review(&id, &caller.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

#[get("/api/users/me/attempts")]
async fn list_my_attempts(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let response = state
        .attempt_service
        .list_user_attempts(
            &caller.user_id,
            pagination.quiz_id.clone(),
            pagination.offset(),
            pagination.limit(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_attempt)
        .service(get_attempt)
        .service(list_my_attempts);
}
