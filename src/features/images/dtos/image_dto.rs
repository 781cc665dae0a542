use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::images::models::ImageRecord;

/// Upload image request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// JPEG, PNG or WEBP image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Plant label, defaults to "planta-desconocida"
    #[schema(example = "Espeletia grandiflora")]
    pub planta_id: Option<String>,
    /// Uploader name, defaults to "usuario_web"
    pub nombre_usuario: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Fields collected from the upload form
#[derive(Debug)]
pub struct UploadImageInput {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub content_type: String,
    pub planta_id: String,
    pub nombre_usuario: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponseDto {
    pub success: bool,
    pub message: String,
    pub planta_id: String,
    /// Generated object name inside the `public/` folder
    pub filename: String,
    pub public_url: String,
    pub estado: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteImageResponseDto {
    pub success: bool,
    pub message: String,
    pub deleted_filename: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChangeStateQuery {
    /// One of pendiente, publicada, rechazada, activo
    pub nuevo_estado: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangeStateResponseDto {
    pub success: bool,
    pub message: String,
    pub nuevo_estado: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EditImageQuery {
    /// New plant label (stored as `planta_id`)
    pub nuevo_nombre: String,
    pub nueva_descripcion: Option<String>,
    pub nueva_lat: Option<f64>,
    pub nueva_lng: Option<f64>,
    /// galeria (default) or noticias
    #[serde(default = "default_publication_type")]
    pub tipo_publicacion: String,
}

fn default_publication_type() -> String {
    "galeria".to_string()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditImageResponseDto {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageListResponseDto {
    pub count: usize,
    /// Raw `imagenes` rows
    #[schema(value_type = Vec<Object>)]
    pub images: Vec<ImageRecord>,
}

impl From<Vec<ImageRecord>> for ImageListResponseDto {
    fn from(images: Vec<ImageRecord>) -> Self {
        Self {
            count: images.len(),
            images,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlantListResponseDto {
    pub count: usize,
    pub plantas: Vec<String>,
}
