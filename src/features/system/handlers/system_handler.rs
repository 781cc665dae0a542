use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::system::dtos::{FrontendConfigDto, HealthResponseDto, RootResponseDto};
use crate::features::system::services::SystemService;

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service status", body = RootResponseDto))
)]
pub async fn root(State(service): State<Arc<SystemService>>) -> Json<RootResponseDto> {
    Json(service.root())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Health report", body = HealthResponseDto))
)]
pub async fn health(State(service): State<Arc<SystemService>>) -> Json<HealthResponseDto> {
    Json(service.health())
}

/// Public settings for the web frontend
#[utoipa::path(
    get,
    path = "/config",
    tag = "system",
    responses((status = 200, description = "Frontend settings", body = FrontendConfigDto))
)]
pub async fn frontend_config(
    State(service): State<Arc<SystemService>>,
) -> Json<FrontendConfigDto> {
    Json(service.frontend_config())
}

/// Retired: API keys are never handed to clients
#[utoipa::path(
    get,
    path = "/api/keys",
    tag = "system",
    responses((status = 410, description = "Endpoint retired"))
)]
pub async fn api_keys() -> Result<Json<()>> {
    Err(AppError::Gone(
        "Este endpoint fue retirado. Use /identify-plant para identificar plantas".to_string(),
    ))
}
