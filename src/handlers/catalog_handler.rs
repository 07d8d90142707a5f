use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    identity::CallerIdentity,
    models::dto::{
        request::{
            CreateClassRequest, CreateSubjectRequest, CreateTermRequest, UpdateClassRequest,
            UpdateSubjectRequest, UpdateTermRequest,
        },
        response::DeleteResponse,
    },
};

// ---- classes ----

#[get("/api/classes")]
async fn list_classes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let classes = state.catalog_service.list_classes().await?;
    Ok(HttpResponse::Ok().json(classes))
}

#[post("/api/classes")]
async fn create_class(
    state: web::Data<AppState>,
    request: web::Json<CreateClassRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let class = state.catalog_service.create_class(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(class))
}

#[get("/api/classes/{id}")]
async fn get_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let class = state.catalog_service.get_class(&id).await?;
    Ok(HttpResponse::Ok().json(class))
}

#[put("/api/classes/{id}")]
async fn update_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateClassRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let class = state
        .catalog_service
        .update_class(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(class))
}

#[delete("/api/classes/{id}")]
async fn delete_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    state.catalog_service.delete_class(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Class '{}' deleted", id),
    }))
}

// ---- terms ----

#[get("/api/classes/{id}/terms")]
async fn list_terms(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let terms = state.catalog_service.list_terms(&class_id).await?;
    Ok(HttpResponse::Ok().json(terms))
}

#[post("/api/classes/{id}/terms")]
async fn create_term(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
    request: web::Json<CreateTermRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let term = state
        .catalog_service
        .create_term(&class_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(term))
}

#[get("/api/terms/{id}")]
async fn get_term(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let term = state.catalog_service.get_term(&id).await?;
    Ok(HttpResponse::Ok().json(term))
}

#[put("/api/terms/{id}")]
async fn update_term(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateTermRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let term = state
        .catalog_service
        .update_term(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(term))
}

#[delete("/api/terms/{id}")]
async fn delete_term(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    state.catalog_service.delete_term(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Term '{}' deleted", id),
    }))
}

// ---- subjects ----

#[get("/api/terms/{id}/subjects")]
async fn list_subjects(
    state: web::Data<AppState>,
    term_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let subjects = state.catalog_service.list_subjects(&term_id).await?;
    Ok(HttpResponse::Ok().json(subjects))
}

#[post("/api/terms/{id}/subjects")]
async fn create_subject(
    state: web::Data<AppState>,
    term_id: web::Path<String>,
    request: web::Json<CreateSubjectRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let subject = state
        .catalog_service
        .create_subject(&term_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(subject))
}

#[get("/api/subjects/{id}")]
async fn get_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let subject = state.catalog_service.get_subject(&id).await?;
    Ok(HttpResponse::Ok().json(subject))
}

#[put("/api/subjects/{id}")]
async fn update_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateSubjectRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let subject = state
        .catalog_service
        .update_subject(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(subject))
}

#[delete("/api/subjects/{id}")]
async fn delete_subject(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    state.catalog_service.delete_subject(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Subject '{}' deleted", id),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_classes)
        .service(create_class)
        .service(get_class)
        .service(update_class)
        .service(delete_class)
        .service(list_terms)
        .service(create_term)
        .service(get_term)
        .service(update_term)
        .service(delete_term)
        .service(list_subjects)
        .service(create_subject)
        .service(get_subject)
        .service(update_subject)
        .service(delete_subject);
}
