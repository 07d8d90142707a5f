use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    identity::CallerIdentity,
    models::dto::{
        request::{AttachFileParams, CreateResourceRequest, ResourceListParams, UpdateResourceRequest},
        response::DeleteResponse,
    },
    services::FileUpload,
};

#[get("/api/subjects/{id}/resources")]
async fn list_resources(
    state: web::Data<AppState>,
    subject_id: web::Path<String>,
    query: web::Query<ResourceListParams>,
) -> Result<HttpResponse, AppError> {
    let resources = state
        .resource_service
        .list_resources(&subject_id, query.published_only.unwrap_or(false))
        .await?;
    Ok(HttpResponse::Ok().json(resources))
}

#[post("/api/subjects/{id}/resources")]
async fn create_resource(
    state: web::Data<AppState>,
    subject_id: web::Path<String>,
    request: web::Json<CreateResourceRequest>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let resource = state
        .resource_service
        .create_resource(&subject_id, request.into_inner(), &caller.user_id, None)
        .await?;
    Ok(HttpResponse::Created().json(resource))
}

#[get("/api/resources/{id}")]
async fn get_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let resource = state.resource_service.get_resource(&id).await?;
    Ok(HttpResponse::Ok().json(resource))
}

#[put("/api/resources/{id}")]
async fn update_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateResourceRequest>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let resource = state
        .resource_service
        .update_resource(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(resource))
}

/// Raw request body is the file content; the original name travels in the
/// query string.
#[put("/api/resources/{id}/file")]
async fn attach_file(
    state: web::Data<AppState>,
    id: web::Path<String>,
    params: web::Query<AttachFileParams>,
    body: web::Bytes,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    params.validate()?;

    let upload = FileUpload {
        file_name: params.into_inner().file_name,
        bytes: body.to_vec(),
    };
    let resource = state.resource_service.attach_file(&id, upload).await?;
    Ok(HttpResponse::Ok().json(resource))
}

#[delete("/api/resources/{id}")]
async fn delete_resource(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    state.resource_service.delete_resource(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Resource '{}' deleted", id),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_resources)
        .service(create_resource)
        .service(get_resource)
        .service(update_resource)
        .service(attach_file)
        .service(delete_resource);
}
