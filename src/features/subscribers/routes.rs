use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::subscribers::handlers::{
    delete_subscriber, delete_subscriber_by_email, list_subscribers, subscribe,
};
use crate::features::subscribers::services::SubscriberService;

pub fn public_routes(subscriber_service: Arc<SubscriberService>) -> Router {
    Router::new()
        .route("/suscribir", post(subscribe))
        .with_state(subscriber_service)
}

/// Subscriber administration
pub fn admin_routes(subscriber_service: Arc<SubscriberService>) -> Router {
    Router::new()
        .route("/suscriptores", get(list_subscribers))
        .route("/eliminar-suscriptor/{id}", delete(delete_subscriber))
        .route("/eliminar-suscriptor-email", delete(delete_subscriber_by_email))
        .with_state(subscriber_service)
}
