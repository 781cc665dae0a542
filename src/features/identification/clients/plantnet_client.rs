use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::PlantIdConfig;
use crate::core::error::{AppError, Result};
use crate::features::identification::dtos::PlantPhoto;

/// Body of a successful `/v2/identify` response; other fields are ignored
#[derive(Debug, Deserialize)]
struct IdentifyBody {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Client for the PlantNet identification API
pub struct PlantNetClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlantNetClient {
    pub fn new(config: &PlantIdConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent("CuencaUbateApi/1.0")
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one photo with automatic organ detection and return the raw results
    pub async fn identify(&self, photo: PlantPhoto) -> Result<Vec<Value>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("API Key no configurada en el servidor".to_string()))?;

        let part = Part::bytes(photo.data)
            .file_name(photo.filename)
            .mime_str(&photo.content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("images", part).text("organs", "auto");

        let url = format!("{}/v2/identify/all", self.base_url);
        tracing::debug!("Sending photo to PlantNet: {}", url);

        // The key travels in the query string; errors are stripped of the URL
        let response = self
            .http_client
            .post(&url)
            .query(&[("api-key", api_key)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("PlantNet request failed: {}", e);
                AppError::ExternalServiceError(format!("PlantNet request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Error desconocido de PlantNet API");

            return Err(AppError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!("PlantNet API error: {}", detail),
            });
        }

        let body: IdentifyBody = response.json().await.map_err(|e| {
            let e = e.without_url();
            AppError::ExternalServiceError(format!("Invalid PlantNet response: {}", e))
        })?;

        Ok(body.results.unwrap_or_default())
    }
}
