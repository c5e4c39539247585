use super::{error::ApiError, AppState};
use crate::{
    logger,
    models::{EditRequest, GenerateRequest, HealthResponse},
};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

pub async fn healthz(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok(state.generator.model_id()))
}

pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let request = body.into_inner();
    log::info!("[req:{}] /generate ({} chars)", request_id, request.prompt.len());

    request
        .validate()
        .map_err(|e| ApiError::new("Generation", e))?;

    let _timer = logger::timer(&format!("[req:{}] generate", request_id));
    let image = state
        .generator
        .generate_image(&request.prompt, &[])
        .await
        .map_err(|e| {
            log::warn!("[req:{}] generation failed: {}", request_id, e);
            ApiError::new("Generation", e)
        })?;

    log::info!(
        "[req:{}] returning {} bytes of {}",
        request_id,
        image.bytes.len(),
        image.mime_type
    );
    Ok(HttpResponse::Ok().json(image.into_response(state.generator.model_id())))
}

pub async fn edit(
    state: web::Data<AppState>,
    body: web::Json<EditRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let request = body.into_inner();
    log::info!(
        "[req:{}] /edit ({} chars, {} image(s))",
        request_id,
        request.prompt.len(),
        request.images.len()
    );

    request.validate().map_err(|e| ApiError::new("Edit", e))?;

    let _timer = logger::timer(&format!("[req:{}] edit", request_id));
    let images = state
        .resolver
        .resolve_all(&request.images)
        .await
        .map_err(|e| ApiError::new("Edit", e))?;

    let image = state
        .generator
        .generate_image(&request.prompt, &images)
        .await
        .map_err(|e| {
            log::warn!("[req:{}] edit failed: {}", request_id, e);
            ApiError::new("Edit", e)
        })?;

    Ok(HttpResponse::Ok().json(image.into_response(state.generator.model_id())))
}
