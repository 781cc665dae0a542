use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedAdmin;
use crate::features::images::dtos::{
    ChangeStateQuery, ChangeStateResponseDto, DeleteImageResponseDto, EditImageQuery,
    EditImageResponseDto, ImageListResponseDto, PlantListResponseDto, UploadImageDto,
    UploadImageInput, UploadImageResponseDto,
};
use crate::features::images::models::{ModerationState, PublicationCategory};
use crate::features::images::services::{ImageEdit, ImageService};
use crate::shared::constants::{is_image_type_allowed, unsupported_image_type_message};

fn actor(admin: &Option<AuthenticatedAdmin>) -> &str {
    admin
        .as_ref()
        .map(|a| a.username.as_str())
        .unwrap_or("anonymous")
}

/// NaN and infinities parse as `f64` but serialize as JSON null
fn finite_coordinate(name: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(AppError::BadRequest(format!(
            "{} must be a number",
            name
        ))),
        other => Ok(other),
    }
}

fn parse_coordinate(name: &str, raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| AppError::BadRequest(format!("{} must be a number", name)))?;
    finite_coordinate(name, Some(value))
}

/// Upload a plant image
///
/// Accepts multipart/form-data with:
/// - `file`: JPEG, PNG or WEBP image (required)
/// - `planta_id`, `nombre_usuario`, `description`: optional text
/// - `lat`, `lng`: optional coordinates
///
/// The image is stored in pending state until a moderator publishes it.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "images",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Image plus plant metadata",
    ),
    responses(
        (status = 200, description = "Image stored, pending review", body = UploadImageResponseDto),
        (status = 400, description = "Missing file, unsupported type or bad coordinates"),
        (status = 500, description = "Storage or database failure")
    )
)]
pub async fn upload_image(
    State(service): State<Arc<ImageService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponseDto>> {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut planta_id = "planta-desconocida".to_string();
    let mut nombre_usuario = "usuario_web".to_string();
    let mut description = String::new();
    let mut lat = None;
    let mut lng = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            "planta_id" | "nombre_usuario" | "description" | "lat" | "lng" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                match field_name.as_str() {
                    "planta_id" => planta_id = text,
                    "nombre_usuario" => nombre_usuario = text,
                    "description" => description = text,
                    "lat" => lat = parse_coordinate("lat", &text)?,
                    _ => lng = parse_coordinate("lng", &text)?,
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let (data, original_filename, content_type) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    if !is_image_type_allowed(&content_type) {
        return Err(AppError::BadRequest(unsupported_image_type_message()));
    }

    let response = service
        .upload(UploadImageInput {
            data,
            original_filename,
            content_type,
            planta_id,
            nombre_usuario,
            description,
            lat,
            lng,
        })
        .await?;

    Ok(Json(response))
}

/// Delete an image and its stored file
#[utoipa::path(
    delete,
    path = "/delete-image/{id}",
    security(
        ("bearer_auth" = [])
    ),
    tag = "images",
    params(("id" = i64, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image deleted", body = DeleteImageResponseDto),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image(
    admin: Option<AuthenticatedAdmin>,
    State(service): State<Arc<ImageService>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteImageResponseDto>> {
    info!("Image {} deletion requested by {}", id, actor(&admin));
    Ok(Json(service.delete(id).await?))
}

/// Change the moderation state of an image
#[utoipa::path(
    put,
    path = "/cambiar-estado/{id}",
    security(
        ("bearer_auth" = [])
    ),
    tag = "images",
    params(("id" = i64, Path, description = "Image id"), ChangeStateQuery),
    responses(
        (status = 200, description = "State changed", body = ChangeStateResponseDto),
        (status = 400, description = "State outside the allow-list"),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn change_state(
    admin: Option<AuthenticatedAdmin>,
    State(service): State<Arc<ImageService>>,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<ChangeStateQuery>,
) -> Result<Json<ChangeStateResponseDto>> {
    let state = query
        .nuevo_estado
        .parse::<ModerationState>()
        .map_err(|_| AppError::BadRequest("Estado no válido".to_string()))?;

    info!(
        "Image {} state change to {} requested by {}",
        id,
        state.as_str(),
        actor(&admin)
    );
    Ok(Json(service.change_state(id, state).await?))
}

/// Edit image metadata
#[utoipa::path(
    put,
    path = "/editar-imagen/{id}",
    security(
        ("bearer_auth" = [])
    ),
    tag = "images",
    params(("id" = i64, Path, description = "Image id"), EditImageQuery),
    responses(
        (status = 200, description = "Update attempted", body = EditImageResponseDto),
        (status = 400, description = "Invalid publication type"),
        (status = 401, description = "Admin token required")
    )
)]
pub async fn edit_image(
    admin: Option<AuthenticatedAdmin>,
    State(service): State<Arc<ImageService>>,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<EditImageQuery>,
) -> Result<Json<EditImageResponseDto>> {
    let tipo_publicacion = query
        .tipo_publicacion
        .parse::<PublicationCategory>()
        .map_err(|_| AppError::BadRequest("Tipo de publicación no válido".to_string()))?;
    let lat = finite_coordinate("nueva_lat", query.nueva_lat)?;
    let lng = finite_coordinate("nueva_lng", query.nueva_lng)?;

    info!("Image {} edit requested by {}", id, actor(&admin));

    let response = service
        .edit(
            id,
            ImageEdit {
                planta_id: query.nuevo_nombre,
                description: query.nueva_descripcion,
                lat,
                lng,
                tipo_publicacion,
            },
        )
        .await?;

    Ok(Json(response))
}

/// List every image
#[utoipa::path(
    get,
    path = "/list-images",
    tag = "images",
    responses((status = 200, description = "All images", body = ImageListResponseDto))
)]
pub async fn list_images(
    State(service): State<Arc<ImageService>>,
) -> Result<Json<ImageListResponseDto>> {
    Ok(Json(service.list().await?.into()))
}

/// Published images with coordinates
#[utoipa::path(
    get,
    path = "/map-images",
    tag = "images",
    responses((status = 200, description = "Images for the map", body = ImageListResponseDto))
)]
pub async fn map_images(
    State(service): State<Arc<ImageService>>,
) -> Result<Json<ImageListResponseDto>> {
    Ok(Json(service.map_images().await?.into()))
}

/// Published images tagged as news
#[utoipa::path(
    get,
    path = "/imagenes-noticias",
    tag = "images",
    responses((status = 200, description = "News images", body = ImageListResponseDto))
)]
pub async fn news_images(
    State(service): State<Arc<ImageService>>,
) -> Result<Json<ImageListResponseDto>> {
    Ok(Json(service.news_images().await?.into()))
}

/// Distinct plant labels
#[utoipa::path(
    get,
    path = "/plantas",
    tag = "images",
    responses((status = 200, description = "Plant labels", body = PlantListResponseDto))
)]
pub async fn list_plants(
    State(service): State<Arc<ImageService>>,
) -> Result<Json<PlantListResponseDto>> {
    let plantas = service.plants().await?;
    Ok(Json(PlantListResponseDto {
        count: plantas.len(),
        plantas,
    }))
}
