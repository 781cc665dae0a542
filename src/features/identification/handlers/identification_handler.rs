use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::identification::dtos::{IdentifyPlantDto, IdentifyResponseDto, PlantPhoto};
use crate::features::identification::services::IdentificationService;
use crate::shared::constants::{is_image_type_allowed, unsupported_image_type_message};

/// Identify a plant from a photo
///
/// The photo is relayed to PlantNet with the server-held API key, so the
/// key never reaches the browser.
#[utoipa::path(
    post,
    path = "/identify-plant",
    tag = "identification",
    request_body(
        content = IdentifyPlantDto,
        content_type = "multipart/form-data",
        description = "Plant photo",
    ),
    responses(
        (status = 200, description = "Identification results", body = IdentifyResponseDto),
        (status = 400, description = "Missing file or unsupported type"),
        (status = 500, description = "API key not configured")
    )
)]
pub async fn identify_plant(
    State(service): State<Arc<IdentificationService>>,
    mut multipart: Multipart,
) -> Result<Json<IdentifyResponseDto>> {
    let mut photo: Option<PlantPhoto> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "planta.jpg".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        photo = Some(PlantPhoto {
            data: data.to_vec(),
            filename,
            content_type,
        });
    }

    let photo = photo.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    if !is_image_type_allowed(&photo.content_type) {
        return Err(AppError::BadRequest(unsupported_image_type_message()));
    }

    Ok(Json(service.identify(photo).await?))
}
