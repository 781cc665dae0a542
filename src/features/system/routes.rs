use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::system::handlers::{api_keys, frontend_config, health, root};
use crate::features::system::services::SystemService;

pub fn routes(service: Arc<SystemService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/config", get(frontend_config))
        .route("/api/keys", get(api_keys))
        .with_state(service)
}
