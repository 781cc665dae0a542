use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Administrator resolved from a verified bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAdmin {
    pub id: i64,
    pub username: String,
}

/// Row of the `usuarios_administradores` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre de usuario", default)]
    pub username: Option<String>,
    #[serde(rename = "contraseña_hash", default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub actualizado_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Claims carried by admin access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Numeric admin id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub exp: i64,
}
