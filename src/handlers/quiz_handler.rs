use actix_web::{get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    identity::{require_author, CallerIdentity},
    models::dto::request::{CreateQuizRequest, UpdateQuizSettingsRequest},
};

#[post("/api/resources/{id}/quiz")]
async fn create_quiz(
    state: web::Data<AppState>,
    resource_id: web::Path<String>,
    request: web::Json<CreateQuizRequest>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(&resource_id, request.into_inner(), &caller.user_id)
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/resources/{id}/quiz")]
async fn get_quiz_by_resource(
    state: web::Data<AppState>,
    resource_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz_by_resource(&resource_id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz_for_taking(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/api/quizzes/{id}/authoring")]
async fn get_quiz_for_authoring(
    state: web::Data<AppState>,
    id: web::Path<String>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    require_author(&caller)?;

    let quiz = state.quiz_service.get_quiz_for_authoring(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[patch("/api/quizzes/{id}")]
async fn update_quiz_settings(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizSettingsRequest>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    require_author(&caller)?;

    let quiz = state
        .quiz_service
        .update_quiz_settings(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_quiz)
        .service(get_quiz_by_resource)
        .service(get_quiz)
        .service(get_quiz_for_authoring)
        .service(update_quiz_settings);
}
