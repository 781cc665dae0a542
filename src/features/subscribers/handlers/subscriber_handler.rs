use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::{AppForm, AppQuery};
use crate::features::subscribers::dtos::{
    DeleteByEmailQuery, SubscribeFormDto, SubscribeResponseDto, SubscriberListResponseDto,
};
use crate::features::subscribers::services::SubscriberService;
use crate::shared::types::MessageResponse;

/// Subscribe to notifications
#[utoipa::path(
    post,
    path = "/suscribir",
    tag = "subscribers",
    request_body(content = SubscribeFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Subscribed, or already subscribed (success=false)", body = SubscribeResponseDto),
        (status = 400, description = "Email no válido")
    )
)]
pub async fn subscribe(
    State(service): State<Arc<SubscriberService>>,
    AppForm(form): AppForm<SubscribeFormDto>,
) -> Result<Json<SubscribeResponseDto>> {
    Ok(Json(service.subscribe(form.nombre, form.email).await?))
}

/// List subscribers, newest first
#[utoipa::path(
    get,
    path = "/suscriptores",
    security(
        ("bearer_auth" = [])
    ),
    tag = "subscribers",
    responses(
        (status = 200, description = "Subscribers", body = SubscriberListResponseDto),
        (status = 401, description = "Admin token required")
    )
)]
pub async fn list_subscribers(
    State(service): State<Arc<SubscriberService>>,
) -> Result<Json<SubscriberListResponseDto>> {
    Ok(Json(service.list().await?))
}

#[utoipa::path(
    delete,
    path = "/eliminar-suscriptor/{id}",
    security(
        ("bearer_auth" = [])
    ),
    tag = "subscribers",
    params(("id" = i64, Path, description = "Subscriber id")),
    responses(
        (status = 200, description = "Subscriber deleted", body = MessageResponse),
        (status = 401, description = "Admin token required")
    )
)]
pub async fn delete_subscriber(
    State(service): State<Arc<SubscriberService>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(service.delete_by_id(id).await?))
}

#[utoipa::path(
    delete,
    path = "/eliminar-suscriptor-email",
    security(
        ("bearer_auth" = [])
    ),
    tag = "subscribers",
    params(DeleteByEmailQuery),
    responses(
        (status = 200, description = "Subscriber deleted", body = MessageResponse),
        (status = 400, description = "Missing email"),
        (status = 401, description = "Admin token required")
    )
)]
pub async fn delete_subscriber_by_email(
    State(service): State<Arc<SubscriberService>>,
    AppQuery(query): AppQuery<DeleteByEmailQuery>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(service.delete_by_email(&query.email).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscribers::routes;
    use crate::shared::constants::TABLE_SUBSCRIBERS;
    use crate::shared::test_helpers::MemoryTableStore;
    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server(store: &Arc<MemoryTableStore>) -> TestServer {
        let service = Arc::new(SubscriberService::new(store.clone()));
        let app = Router::new()
            .merge(routes::public_routes(Arc::clone(&service)))
            .merge(routes::admin_routes(service));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_subscribe_form_twice() {
        let store = Arc::new(MemoryTableStore::new());
        let server = server(&store);
        let form = vec![("nombre", "Ana"), ("email", "ana@example.com")];

        let first = server.post("/suscribir").form(&form).await;
        first.assert_status_ok();
        assert_eq!(
            first.json::<Value>()["suscriptor"]["email"],
            json!("ana@example.com")
        );

        let second = server.post("/suscribir").form(&form).await;
        second.assert_status_ok();
        let body = second.json::<Value>();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["email"], json!("ana@example.com"));

        assert_eq!(store.rows(TABLE_SUBSCRIBERS).len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_bad_email() {
        let store = Arc::new(MemoryTableStore::new());
        let server = server(&store);

        let response = server
            .post("/suscribir")
            .form(&vec![("nombre", "Ana"), ("email", "ana")])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], json!("Email no válido"));
    }

    #[tokio::test]
    async fn test_list_and_delete_by_email() {
        let store = Arc::new(MemoryTableStore::new());
        store.seed(
            TABLE_SUBSCRIBERS,
            vec![json!({"id": 4, "nombre": "Luis", "email": "luis@x.co", "fecha_registro": "2024-01-01"})],
        );
        let server = server(&store);

        let list = server.get("/suscriptores").await.json::<Value>();
        assert_eq!(list["count"], json!(1));
        assert_eq!(list["suscriptores"][0]["nombre"], json!("Luis"));

        server
            .delete("/eliminar-suscriptor-email")
            .add_query_param("email", "luis@x.co")
            .await
            .assert_status_ok();
        assert!(store.rows(TABLE_SUBSCRIBERS).is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_email_requires_email() {
        let store = Arc::new(MemoryTableStore::new());
        let server = server(&store);

        server
            .delete("/eliminar-suscriptor-email")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
