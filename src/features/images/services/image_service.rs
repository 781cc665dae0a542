use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::images::dtos::{
    ChangeStateResponseDto, DeleteImageResponseDto, EditImageResponseDto, UploadImageInput,
    UploadImageResponseDto,
};
use crate::features::images::models::{
    ImageRecord, ImageSchema, ModerationState, PublicationCategory,
};
use crate::modules::supabase::{decode_rows, Filter, ObjectStore, Query, TableStore};
use crate::shared::constants::{PUBLIC_FOLDER, TABLE_IMAGES};
use crate::shared::validation::image_extension;

/// Fields an edit may touch, in the order they are reported back
const EDITABLE_FIELDS: [&str; 5] = ["planta_id", "description", "lat", "lng", "tipo_publicacion"];

/// Changes requested by the edit endpoint
#[derive(Debug, Clone)]
pub struct ImageEdit {
    pub planta_id: String,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub tipo_publicacion: PublicationCategory,
}

/// Service for image uploads, moderation and public listings
pub struct ImageService {
    store: Arc<dyn TableStore>,
    storage: Arc<dyn ObjectStore>,
    schema: ImageSchema,
}

impl ImageService {
    pub fn new(
        store: Arc<dyn TableStore>,
        storage: Arc<dyn ObjectStore>,
        schema: ImageSchema,
    ) -> Self {
        Self {
            store,
            storage,
            schema,
        }
    }

    fn object_path(filename: &str) -> String {
        format!("{}/{}", PUBLIC_FOLDER, filename)
    }

    /// Store the image then record it as pending review
    ///
    /// If the row cannot be written the stored object is removed again so
    /// no orphan is left behind.
    pub async fn upload(&self, input: UploadImageInput) -> Result<UploadImageResponseDto> {
        let filename = format!(
            "{}.{}",
            Uuid::new_v4(),
            image_extension(&input.original_filename)
        );
        let path = Self::object_path(&filename);

        debug!("Uploading image to storage: {}", path);
        self.storage
            .upload(&path, input.data, &input.content_type)
            .await?;

        let public_url = self.storage.public_url(&path);
        let estado = ModerationState::Pendiente.as_str();

        let mut record = Map::new();
        record.insert("filename".into(), json!(filename));
        record.insert("nombre_usuario".into(), json!(input.nombre_usuario));
        record.insert("planta_id".into(), json!(input.planta_id));
        record.insert("url_imagen".into(), json!(public_url));
        record.insert("estado".into(), json!(estado));
        record.insert("fecha_subida".into(), json!(Utc::now().to_rfc3339()));
        record.insert("lat".into(), json!(input.lat));
        record.insert("lng".into(), json!(input.lng));
        record.insert(
            "tipo_publicacion".into(),
            json!(PublicationCategory::Galeria.as_str()),
        );
        if !input.description.is_empty() {
            record.insert("description".into(), json!(input.description));
        }

        let store = Arc::clone(&self.store);
        let inserted = self
            .schema
            .write(record, |row| {
                let store = Arc::clone(&store);
                async move { store.insert(TABLE_IMAGES, &row).await }
            })
            .await;

        if let Err(err) = inserted {
            warn!(
                "Saving metadata for '{}' failed, removing stored object: {}",
                path, err
            );
            if let Err(cleanup) = self.storage.remove(std::slice::from_ref(&path)).await {
                warn!("Could not remove orphaned object '{}': {}", path, cleanup);
            }
            return Err(err.into());
        }

        info!(
            "Image uploaded: filename={}, planta_id={}, estado={}",
            filename, input.planta_id, estado
        );

        Ok(UploadImageResponseDto {
            success: true,
            message: format!(
                "Imagen guardada para planta {} (pendiente de revisión)",
                input.planta_id
            ),
            planta_id: input.planta_id,
            filename,
            public_url,
            estado: estado.to_string(),
            lat: input.lat,
            lng: input.lng,
        })
    }

    async fn find(&self, id: i64) -> Result<Option<ImageRecord>> {
        let rows = self
            .store
            .select(TABLE_IMAGES, Query::new().eq("id", id).limit(1))
            .await?;
        Ok(decode_rows::<ImageRecord>(rows)?.into_iter().next())
    }

    /// Remove the stored object and the row
    pub async fn delete(&self, id: i64) -> Result<DeleteImageResponseDto> {
        let image = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Imagen no encontrada".to_string()))?;

        let filename = image.filename.unwrap_or_default();
        if !filename.is_empty() {
            self.storage.remove(&[Self::object_path(&filename)]).await?;
        }

        self.store
            .delete(TABLE_IMAGES, &[Filter::eq("id", id)])
            .await?;

        info!("Image deleted: id={}, filename={}", id, filename);

        Ok(DeleteImageResponseDto {
            success: true,
            message: "Imagen eliminada correctamente".to_string(),
            deleted_filename: filename,
        })
    }

    pub async fn change_state(
        &self,
        id: i64,
        state: ModerationState,
    ) -> Result<ChangeStateResponseDto> {
        let updated = self
            .store
            .update(
                TABLE_IMAGES,
                &json!({ "estado": state.as_str() }),
                &[Filter::eq("id", id)],
            )
            .await?;

        if updated.is_empty() {
            return Err(AppError::NotFound("Imagen no encontrada".to_string()));
        }

        info!("Image {} moved to state {}", id, state.as_str());

        Ok(ChangeStateResponseDto {
            success: true,
            message: format!("Estado cambiado a {}", state.as_str()),
            nuevo_estado: state.as_str().to_string(),
        })
    }

    /// Update metadata, skipping fields the caller left out
    pub async fn edit(&self, id: i64, edit: ImageEdit) -> Result<EditImageResponseDto> {
        let mut changes = Map::new();
        changes.insert("planta_id".into(), json!(edit.planta_id));
        if let Some(description) = edit.description {
            changes.insert("description".into(), json!(description));
        }
        if let Some(lat) = edit.lat {
            changes.insert("lat".into(), json!(lat));
        }
        if let Some(lng) = edit.lng {
            changes.insert("lng".into(), json!(lng));
        }
        changes.insert(
            "tipo_publicacion".into(),
            json!(edit.tipo_publicacion.as_str()),
        );

        debug!("Updating image {} with {:?}", id, changes);

        let store = Arc::clone(&self.store);
        let (rows, applied) = self
            .schema
            .write(changes, |body| {
                let store = Arc::clone(&store);
                async move {
                    store
                        .update(TABLE_IMAGES, &body, &[Filter::eq("id", id)])
                        .await
                }
            })
            .await?;

        if rows.is_empty() {
            return Ok(EditImageResponseDto {
                success: false,
                message: "No se pudo actualizar la imagen".to_string(),
                updated_fields: None,
            });
        }

        let updated_fields = EDITABLE_FIELDS
            .iter()
            .filter(|f| applied.contains_key(**f))
            .map(|f| f.to_string())
            .collect();

        info!("Image {} metadata updated", id);

        Ok(EditImageResponseDto {
            success: true,
            message: "Imagen actualizada correctamente".to_string(),
            updated_fields: Some(updated_fields),
        })
    }

    pub async fn list(&self) -> Result<Vec<ImageRecord>> {
        let rows = self.store.select(TABLE_IMAGES, Query::new()).await?;
        Ok(decode_rows(rows)?)
    }

    /// Published images that can be pinned on the map
    pub async fn map_images(&self) -> Result<Vec<ImageRecord>> {
        Ok(Self::map_visible(self.list().await?))
    }

    /// Published images tagged as news
    pub async fn news_images(&self) -> Result<Vec<ImageRecord>> {
        Ok(Self::news_visible(self.list().await?))
    }

    pub async fn plants(&self) -> Result<Vec<String>> {
        let rows = self
            .store
            .select(TABLE_IMAGES, Query::new().columns("planta_id"))
            .await?;
        Ok(Self::unique_plants(&decode_rows::<ImageRecord>(rows)?))
    }

    pub fn map_visible(images: Vec<ImageRecord>) -> Vec<ImageRecord> {
        images
            .into_iter()
            .filter(|img| img.has_coordinates() && img.is_published())
            .collect()
    }

    pub fn news_visible(images: Vec<ImageRecord>) -> Vec<ImageRecord> {
        images
            .into_iter()
            .filter(|img| img.is_news() && img.is_published())
            .collect()
    }

    pub fn unique_plants(images: &[ImageRecord]) -> Vec<String> {
        images
            .iter()
            .filter_map(|img| img.planta_id.as_deref())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{MemoryObjectStore, MemoryTableStore};
    use serde_json::json;

    fn record(value: Value) -> ImageRecord {
        serde_json::from_value(value).unwrap()
    }

    fn upload_input() -> UploadImageInput {
        UploadImageInput {
            data: vec![1, 2, 3],
            original_filename: "frailejon.png".to_string(),
            content_type: "image/png".to_string(),
            planta_id: "Frailejón".to_string(),
            nombre_usuario: "ana".to_string(),
            description: "Páramo de Guerrero".to_string(),
            lat: Some(5.3),
            lng: Some(-73.8),
        }
    }

    fn service(
        store: &Arc<MemoryTableStore>,
        storage: &Arc<MemoryObjectStore>,
        schema: ImageSchema,
    ) -> ImageService {
        ImageService::new(store.clone(), storage.clone(), schema)
    }

    #[test]
    fn test_map_visible_requires_coordinates_and_publication() {
        let images = vec![
            record(json!({"id": 1, "estado": "publicada", "lat": 5.0, "lng": -73.0})),
            record(json!({"id": 2, "estado": "publicada", "lat": null, "lng": -73.0})),
            record(json!({"id": 3, "estado": "publicada", "lat": 5.0})),
            record(json!({"id": 4, "estado": "pendiente", "lat": 5.0, "lng": -73.0})),
            record(json!({"id": 5, "lat": 5.0, "lng": -73.0})),
        ];

        let visible = ImageService::map_visible(images);
        assert_eq!(visible.iter().map(|i| i.id).collect::<Vec<_>>(), vec![Some(1)]);
    }

    #[test]
    fn test_news_visible_requires_news_and_publication() {
        let images = vec![
            record(json!({"id": 1, "estado": "publicada", "tipo_publicacion": "noticias"})),
            record(json!({"id": 2, "estado": "publicada", "tipo_publicacion": "galeria"})),
            record(json!({"id": 3, "estado": "rechazada", "tipo_publicacion": "noticias"})),
            record(json!({"id": 4, "estado": "publicada"})),
        ];

        let visible = ImageService::news_visible(images);
        assert_eq!(visible.iter().map(|i| i.id).collect::<Vec<_>>(), vec![Some(1)]);
    }

    #[test]
    fn test_unique_plants_skips_empty_and_duplicates() {
        let images = vec![
            record(json!({"planta_id": "Espeletia"})),
            record(json!({"planta_id": "Quercus"})),
            record(json!({"planta_id": "Espeletia"})),
            record(json!({"planta_id": ""})),
            record(json!({"planta_id": null})),
        ];

        assert_eq!(
            ImageService::unique_plants(&images),
            vec!["Espeletia".to_string(), "Quercus".to_string()]
        );
    }

    #[tokio::test]
    async fn test_upload_stores_one_object_and_one_pending_row() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let response = svc.upload(upload_input()).await.unwrap();

        assert_eq!(response.estado, "pendiente");
        assert!(response.filename.ends_with(".png"));
        assert_eq!(storage.paths(), vec![format!("public/{}", response.filename)]);

        let rows = store.rows(TABLE_IMAGES);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["estado"], json!("pendiente"));
        assert_eq!(rows[0]["tipo_publicacion"], json!("galeria"));
        assert_eq!(rows[0]["description"], json!("Páramo de Guerrero"));
        assert_eq!(rows[0]["url_imagen"], json!(response.public_url));
    }

    #[tokio::test]
    async fn test_upload_omits_empty_description() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let mut input = upload_input();
        input.description = String::new();
        svc.upload(input).await.unwrap();

        assert!(store.rows(TABLE_IMAGES)[0].get("description").is_none());
    }

    #[tokio::test]
    async fn test_upload_survives_missing_optional_columns() {
        let store = Arc::new(
            MemoryTableStore::new().with_missing_columns(TABLE_IMAGES, &["description", "lat"]),
        );
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        svc.upload(upload_input()).await.unwrap();

        let rows = store.rows(TABLE_IMAGES);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("description").is_none());
        assert!(rows[0].get("lat").is_none());
        assert!(rows[0].get("lng").is_none());
        assert_eq!(rows[0]["tipo_publicacion"], json!("galeria"));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_object() {
        let store = Arc::new(MemoryTableStore::new());
        store.fail_writes("permission denied for table imagenes");
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let result = svc.upload(upload_input()).await;

        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(storage.paths().is_empty());
        assert_eq!(storage.removed().len(), 1);
    }

    #[tokio::test]
    async fn test_versioned_schema_prunes_before_insert() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Versioned(1));

        svc.upload(upload_input()).await.unwrap();

        let row = &store.rows(TABLE_IMAGES)[0];
        assert!(row.get("description").is_none());
        assert!(row.get("lat").is_none());
        assert!(row.get("tipo_publicacion").is_none());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_object_and_row() {
        let store = Arc::new(MemoryTableStore::new());
        store.seed(TABLE_IMAGES, vec![json!({"id": 3, "filename": "x.jpg"})]);
        let storage = Arc::new(MemoryObjectStore::new());
        storage.put("public/x.jpg");
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let response = svc.delete(3).await.unwrap();

        assert_eq!(response.deleted_filename, "x.jpg");
        assert!(storage.paths().is_empty());
        assert!(store.rows(TABLE_IMAGES).is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_image_is_not_found() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        assert!(matches!(svc.delete(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_edit_reports_applied_fields_in_order() {
        let store = Arc::new(
            MemoryTableStore::new().with_missing_columns(TABLE_IMAGES, &["tipo_publicacion"]),
        );
        store.seed(TABLE_IMAGES, vec![json!({"id": 1, "planta_id": "viejo"})]);
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let response = svc
            .edit(
                1,
                ImageEdit {
                    planta_id: "nuevo".to_string(),
                    description: None,
                    lat: Some(5.0),
                    lng: Some(-73.0),
                    tipo_publicacion: PublicationCategory::Noticias,
                },
            )
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(
            response.updated_fields.unwrap(),
            vec!["planta_id", "lat", "lng"]
        );
        assert_eq!(store.rows(TABLE_IMAGES)[0]["planta_id"], json!("nuevo"));
    }

    #[tokio::test]
    async fn test_edit_unknown_image_reports_failure() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        let response = svc
            .edit(
                42,
                ImageEdit {
                    planta_id: "x".to_string(),
                    description: None,
                    lat: None,
                    lng: None,
                    tipo_publicacion: PublicationCategory::Galeria,
                },
            )
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.message, "No se pudo actualizar la imagen");
    }

    #[tokio::test]
    async fn test_failed_storage_upload_writes_no_row() {
        let store = Arc::new(MemoryTableStore::new());
        let storage = Arc::new(MemoryObjectStore::new());
        storage.fail_uploads();
        let svc = service(&store, &storage, ImageSchema::Tolerant);

        assert!(svc.upload(upload_input()).await.is_err());
        assert_eq!(store.write_count(), 0);
    }
}
