use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Auth routes, all public
pub fn routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/verify-token", get(handlers::verify_token))
        .route("/cambiar-password", post(handlers::change_password))
        .with_state(service)
}
