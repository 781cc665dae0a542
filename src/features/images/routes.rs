use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::images::handlers::{
    change_state, delete_image, edit_image, list_images, list_plants, map_images, news_images,
    upload_image,
};
use crate::features::images::services::ImageService;

/// Upload and read routes, open to everyone
pub fn public_routes(image_service: Arc<ImageService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/upload",
            // Multipart overhead on top of the configured body size
            post(upload_image).layer(DefaultBodyLimit::max(max_body_size + 1024 * 1024)),
        )
        .route("/list-images", get(list_images))
        .route("/map-images", get(map_images))
        .route("/imagenes-noticias", get(news_images))
        .route("/plantas", get(list_plants))
        .with_state(image_service)
}

/// Moderation routes
pub fn admin_routes(image_service: Arc<ImageService>) -> Router {
    Router::new()
        .route("/delete-image/{id}", delete(delete_image))
        .route("/cambiar-estado/{id}", put(change_state))
        .route("/editar-imagen/{id}", put(edit_image))
        .with_state(image_service)
}
