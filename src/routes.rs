use std::sync::Arc;
use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::*;
use crate::repo::IdeaRepo;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/ideas")
            // malformed ids and bodies are validation errors, not 404s
            .app_data(web::PathConfig::default().error_handler(|_, _| ApiError::bad_request("invalid id").into()))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                ApiError::bad_request(format!("invalid request body: {err}")).into()
            }))
            .service(
                web::resource("")
                    .route(web::get().to(list_ideas))
                    .route(web::post().to(create_idea)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_idea))
                    .route(web::put().to(update_idea))
                    .route(web::delete().to(delete_idea)),
            )
            .service(web::resource("/{id}/status").route(web::patch().to(update_status))),
    );
}

#[derive(Clone)]
pub struct AppState { pub repo: Arc<dyn IdeaRepo> }

#[utoipa::path(
    get,
    path = "/api/ideas",
    responses(
        (status = 200, description = "All ideas, newest fecha first", body = [Idea]),
        (status = 500, description = "Storage failure", body = crate::error::ApiErrorBody)
    )
)]
pub async fn list_ideas(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let ideas = data.repo.list_ideas().await?;
    Ok(HttpResponse::Ok().json(ideas))
}

#[utoipa::path(
    get,
    path = "/api/ideas/{id}",
    params(("id" = i64, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea", body = Idea),
        (status = 400, description = "Invalid id", body = crate::error::ApiErrorBody),
        (status = 404, description = "Idea not found", body = crate::error::ApiErrorBody)
    )
)]
pub async fn get_idea(data: web::Data<AppState>, path: web::Path<Id>) -> Result<HttpResponse, ApiError> {
    let idea = data.repo.get_idea(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(idea))
}

#[utoipa::path(
    post,
    path = "/api/ideas",
    request_body = NewIdea,
    responses(
        (status = 201, description = "Idea created", body = Idea),
        (status = 400, description = "Missing or malformed fields", body = crate::error::ApiErrorBody)
    )
)]
pub async fn create_idea(
    data: web::Data<AppState>,
    payload: web::Json<NewIdea>,
) -> Result<HttpResponse, ApiError> {
    let idea = data.repo.create_idea(payload.into_inner()).await?;
    tracing::info!(id = idea.id, "idea created");
    Ok(HttpResponse::Created().json(idea))
}

#[utoipa::path(
    put,
    path = "/api/ideas/{id}",
    request_body = UpdateIdea,
    params(("id" = i64, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea updated", body = Idea),
        (status = 400, description = "Invalid id or body", body = crate::error::ApiErrorBody),
        (status = 404, description = "Idea not found", body = crate::error::ApiErrorBody)
    )
)]
pub async fn update_idea(
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<UpdateIdea>,
) -> Result<HttpResponse, ApiError> {
    let idea = data.repo.update_idea(path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(idea))
}

#[utoipa::path(
    delete,
    path = "/api/ideas/{id}",
    params(("id" = i64, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea deleted", body = DeleteResponse),
        (status = 400, description = "Invalid id", body = crate::error::ApiErrorBody),
        (status = 404, description = "Idea not found", body = crate::error::ApiErrorBody)
    )
)]
pub async fn delete_idea(data: web::Data<AppState>, path: web::Path<Id>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    data.repo.delete_idea(id).await?;
    tracing::info!(id, "idea deleted");
    Ok(HttpResponse::Ok().json(DeleteResponse { success: true }))
}

#[utoipa::path(
    patch,
    path = "/api/ideas/{id}/status",
    request_body = StatusUpdate,
    params(("id" = i64, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Status updated", body = Idea),
        (status = 400, description = "Invalid id or status outside 1-4", body = crate::error::ApiErrorBody),
        (status = 404, description = "Idea not found", body = crate::error::ApiErrorBody)
    )
)]
pub async fn update_status(
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let status = status_from_json(&payload.status)
        .ok_or_else(|| ApiError::bad_request("invalid status: must be 1, 2, 3 or 4"))?;
    let idea = data.repo.update_status(path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(idea))
}

// Strict on writes, unlike the lenient read path: only JSON numbers with an
// integral value in 1..=4 (so `2.0` is fine, `"2"` and `2.5` are not).
fn status_from_json(value: &serde_json::Value) -> Option<IdeaStatus> {
    if let Some(code) = value.as_i64() {
        return IdeaStatus::from_code(code);
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && (1.0..=4.0).contains(n))
        .and_then(|n| IdeaStatus::from_code(n as i64))
}
