use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::subscribers::dtos::{
    SubscribeResponseDto, SubscriberListResponseDto, SubscriberSummaryDto,
};
use crate::features::subscribers::models::SubscriberRecord;
use crate::modules::supabase::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::TABLE_SUBSCRIBERS;
use crate::shared::types::MessageResponse;
use crate::shared::validation::looks_like_email;

/// Service for newsletter subscriptions
pub struct SubscriberService {
    store: Arc<dyn TableStore>,
}

impl SubscriberService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Subscribe `email` unless it is already on the list
    pub async fn subscribe(&self, nombre: String, email: String) -> Result<SubscribeResponseDto> {
        if !looks_like_email(&email) {
            return Err(AppError::BadRequest("Email no válido".to_string()));
        }

        let existing = self
            .store
            .select(TABLE_SUBSCRIBERS, Query::new().eq("email", &email).limit(1))
            .await?;

        if !existing.is_empty() {
            return Ok(SubscribeResponseDto {
                success: false,
                message: "Este email ya está suscrito".to_string(),
                email: Some(email),
                suscriptor: None,
            });
        }

        let fecha_registro = Utc::now().to_rfc3339();
        self.store
            .insert(
                TABLE_SUBSCRIBERS,
                &json!({
                    "nombre": nombre,
                    "email": email,
                    "fecha_registro": fecha_registro,
                    "activo": true,
                }),
            )
            .await?;

        info!("New subscriber registered");

        Ok(SubscribeResponseDto {
            success: true,
            message: format!("¡Gracias {}! Te has suscrito exitosamente.", nombre),
            email: None,
            suscriptor: Some(SubscriberSummaryDto {
                nombre,
                email,
                fecha_registro,
            }),
        })
    }

    /// All subscribers, newest first
    pub async fn list(&self) -> Result<SubscriberListResponseDto> {
        let rows = self
            .store
            .select(TABLE_SUBSCRIBERS, Query::new().order_desc("fecha_registro"))
            .await?;
        let suscriptores: Vec<SubscriberRecord> = decode_rows(rows)?;

        Ok(SubscriberListResponseDto {
            success: true,
            count: suscriptores.len(),
            suscriptores,
        })
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<MessageResponse> {
        self.store
            .delete(TABLE_SUBSCRIBERS, &[Filter::eq("id", id)])
            .await?;
        info!("Subscriber {} deleted", id);
        Ok(MessageResponse::ok("Suscriptor eliminado correctamente"))
    }

    pub async fn delete_by_email(&self, email: &str) -> Result<MessageResponse> {
        self.store
            .delete(TABLE_SUBSCRIBERS, &[Filter::eq("email", email)])
            .await?;
        info!("Subscriber deleted by email");
        Ok(MessageResponse::ok(format!(
            "Suscriptor con email {} eliminado correctamente",
            email
        )))
    }
}
