use chrono::Local;
use std::sync::Arc;

use crate::core::config::FrontendConfig;
use crate::features::system::dtos::{
    FrontendConfigDto, HealthResponseDto, RootResponseDto, ServicesStatusDto,
};
use crate::modules::supabase::{Query, TableStore};
use crate::shared::constants::TABLE_IMAGES;

/// Service status and public frontend settings
pub struct SystemService {
    frontend: FrontendConfig,
    store_connected: bool,
}

impl SystemService {
    pub fn new(frontend: FrontendConfig, store_connected: bool) -> Self {
        Self {
            frontend,
            store_connected,
        }
    }

    /// One cheap read against the images table
    pub async fn probe(store: &Arc<dyn TableStore>) -> bool {
        match store.select(TABLE_IMAGES, Query::new().limit(1)).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Store probe failed: {}", e);
                false
            }
        }
    }

    fn database_status(&self) -> String {
        if self.store_connected {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        }
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }

    pub fn root(&self) -> RootResponseDto {
        RootResponseDto {
            message: "API Cuenca Ubate funcionando".to_string(),
            status: "online".to_string(),
            timestamp: Self::timestamp(),
            database: self.database_status(),
        }
    }

    pub fn health(&self) -> HealthResponseDto {
        HealthResponseDto {
            status: "healthy".to_string(),
            timestamp: Self::timestamp(),
            services: ServicesStatusDto {
                api: "running".to_string(),
                database: self.database_status(),
            },
        }
    }

    pub fn frontend_config(&self) -> FrontendConfigDto {
        FrontendConfigDto {
            api_base_url: self.frontend.api_base_url.clone(),
            environment: self.frontend.environment.clone(),
            supabase_url: self.frontend.supabase_url.clone(),
            emailjs_service_id: self.frontend.emailjs_service_id.clone(),
            emailjs_template_id: self.frontend.emailjs_template_id.clone(),
        }
    }
}
