use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponseDto {
    pub message: String,
    pub status: String,
    pub timestamp: String,
    /// connected or disconnected
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServicesStatusDto {
    pub api: String,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    pub status: String,
    pub timestamp: String,
    pub services: ServicesStatusDto,
}

/// Public settings for the web frontend; never carries secrets
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FrontendConfigDto {
    #[serde(rename = "API_BASE_URL")]
    pub api_base_url: String,
    #[serde(rename = "ENVIRONMENT")]
    pub environment: String,
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: Option<String>,
    #[serde(rename = "EMAILJS_SERVICE_ID")]
    pub emailjs_service_id: Option<String>,
    #[serde(rename = "EMAILJS_TEMPLATE_ID")]
    pub emailjs_template_id: Option<String>,
}
