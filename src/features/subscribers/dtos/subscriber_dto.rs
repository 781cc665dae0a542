use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::subscribers::models::SubscriberRecord;

/// Form body of `POST /suscribir`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscribeFormDto {
    #[schema(example = "Ana")]
    pub nombre: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriberSummaryDto {
    pub nombre: String,
    pub email: String,
    pub fecha_registro: String,
}

/// `suscriptor` is set on a new subscription, `email` when it already existed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeResponseDto {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suscriptor: Option<SubscriberSummaryDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberListResponseDto {
    pub success: bool,
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub suscriptores: Vec<SubscriberRecord>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteByEmailQuery {
    pub email: String,
}
