use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::identification::handlers::identify_plant;
use crate::features::identification::services::IdentificationService;

pub fn routes(service: Arc<IdentificationService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/identify-plant",
            post(identify_plant).layer(DefaultBodyLimit::max(max_body_size + 1024 * 1024)),
        )
        .with_state(service)
}
