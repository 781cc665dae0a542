use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row of the `suscriptores` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub fecha_registro: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
