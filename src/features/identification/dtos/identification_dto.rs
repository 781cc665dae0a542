use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Identify request DTO for OpenAPI documentation only; the handler reads
/// the multipart body directly
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct IdentifyPlantDto {
    /// JPEG, PNG or WEBP photo of the plant
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Photo forwarded to the identification API
#[derive(Debug, Clone)]
pub struct PlantPhoto {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdentifyResponseDto {
    pub success: bool,
    pub message: String,
    /// PlantNet results, best first
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub best_match: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

impl IdentifyResponseDto {
    pub fn from_results(results: Vec<Value>) -> Self {
        match results.first().cloned() {
            None => Self {
                success: true,
                message: "No se pudo identificar la planta con certeza".to_string(),
                results,
                best_match: None,
                suggestions: Some(
                    "Intente con una imagen más clara o desde otro ángulo".to_string(),
                ),
            },
            Some(best) => Self {
                success: true,
                message: format!(
                    "Identificación exitosa. {} resultados encontrados",
                    results.len()
                ),
                results,
                best_match: Some(best),
                suggestions: None,
            },
        }
    }
}
