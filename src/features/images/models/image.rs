use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use utoipa::ToSchema;

/// Moderation state of an uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModerationState {
    /// Waiting for review, every upload starts here
    Pendiente,
    /// Visible on the public gallery, map and news
    Publicada,
    Rechazada,
    Activo,
}

impl ModerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationState::Pendiente => "pendiente",
            ModerationState::Publicada => "publicada",
            ModerationState::Rechazada => "rechazada",
            ModerationState::Activo => "activo",
        }
    }
}

impl FromStr for ModerationState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(ModerationState::Pendiente),
            "publicada" => Ok(ModerationState::Publicada),
            "rechazada" => Ok(ModerationState::Rechazada),
            "activo" => Ok(ModerationState::Activo),
            _ => Err(()),
        }
    }
}

/// Where a published image is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PublicationCategory {
    Galeria,
    Noticias,
}

impl PublicationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationCategory::Galeria => "galeria",
            PublicationCategory::Noticias => "noticias",
        }
    }
}

impl FromStr for PublicationCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "galeria" => Ok(PublicationCategory::Galeria),
            "noticias" => Ok(PublicationCategory::Noticias),
            _ => Err(()),
        }
    }
}

/// Row of the `imagenes` table
///
/// The table is owned by Supabase and its columns drift between
/// deployments, so every column is optional and unknown ones are carried
/// through untouched. Empty columns are left out when serializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_usuario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planta_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_imagen: Option<String>,
    /// Kept as text so rows with unexpected states still load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_subida: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_publicacion: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRecord {
    pub fn is_published(&self) -> bool {
        self.estado.as_deref() == Some(ModerationState::Publicada.as_str())
    }

    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    pub fn is_news(&self) -> bool {
        self.tipo_publicacion.as_deref() == Some(PublicationCategory::Noticias.as_str())
    }
}
