use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppForm, AppQuery};
use crate::features::auth::dtos::{
    ChangePasswordFormDto, LoginFormDto, LoginResponseDto, VerifyTokenQuery,
    VerifyTokenResponseDto,
};
use crate::features::auth::services::AuthService;
use crate::shared::types::MessageResponse;

/// Log in as administrator
///
/// Returns a bearer token valid for `ACCESS_TOKEN_EXPIRE_MINUTES`.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in", body = LoginResponseDto),
        (status = 401, description = "Credenciales incorrectas")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppForm(form): AppForm<LoginFormDto>,
) -> Result<Json<LoginResponseDto>> {
    let response = service.login(&form.nombre_usuario, &form.password).await?;
    Ok(Json(response))
}

/// Check whether a token is still valid
#[utoipa::path(
    get,
    path = "/verify-token",
    params(VerifyTokenQuery),
    responses(
        (status = 200, description = "Token valid", body = VerifyTokenResponseDto),
        (status = 401, description = "Token invalid, expired or for a removed admin")
    ),
    tag = "auth"
)]
pub async fn verify_token(
    State(service): State<Arc<AuthService>>,
    AppQuery(query): AppQuery<VerifyTokenQuery>,
) -> Result<Json<VerifyTokenResponseDto>> {
    let admin = service.verify_token(&query.token).await?;
    Ok(Json(VerifyTokenResponseDto {
        valid: true,
        nombre_usuario: admin.username,
        id: admin.id,
    }))
}

/// Change an administrator password
#[utoipa::path(
    post,
    path = "/cambiar-password",
    request_body(content = ChangePasswordFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Credenciales incorrectas")
    ),
    tag = "auth"
)]
pub async fn change_password(
    State(service): State<Arc<AuthService>>,
    AppForm(form): AppForm<ChangePasswordFormDto>,
) -> Result<Json<MessageResponse>> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(Json(service.change_password(form).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::routes;
    use crate::features::auth::services::TokenService;
    use crate::shared::constants::TABLE_ADMINS;
    use crate::shared::test_helpers::{admin_row, MemoryTableStore};
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> (TestServer, Arc<MemoryTableStore>) {
        let store = Arc::new(MemoryTableStore::new());
        store.seed(TABLE_ADMINS, vec![admin_row(9, "moderador", "clave123")]);
        let tokens = Arc::new(TokenService::new(&AuthConfig {
            secret_key: "handler-secret".to_string(),
            access_token_expire_minutes: 30,
        }));
        let service = Arc::new(AuthService::new(store.clone(), tokens));
        (TestServer::new(routes::routes(service)).unwrap(), store)
    }

    #[tokio::test]
    async fn test_login_and_verify_round() {
        let (server, _) = server();

        let login = server
            .post("/login")
            .form(&vec![("nombre_usuario", "moderador"), ("contraseña", "clave123")])
            .await;
        login.assert_status_ok();
        let body = login.json::<Value>();
        assert_eq!(body["token_type"], json!("bearer"));
        assert_eq!(body["id"], json!(9));

        let token = body["access_token"].as_str().unwrap().to_string();
        let verify = server.get("/verify-token").add_query_param("token", token).await;
        verify.assert_status_ok();
        assert_eq!(
            verify.json::<Value>(),
            json!({"valid": true, "nombre_usuario": "moderador", "id": 9})
        );
    }

    #[tokio::test]
    async fn test_wrong_password_is_401_with_challenge() {
        let (server, _) = server();

        let response = server
            .post("/login")
            .form(&vec![("nombre_usuario", "moderador"), ("contraseña", "nope")])
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Credenciales incorrectas")
        );
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let (server, _) = server();

        let response = server
            .get("/verify-token")
            .add_query_param("token", "abc.def.ghi")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["message"],
            json!("Token inválido o expirado")
        );
    }

    #[tokio::test]
    async fn test_change_password_validation() {
        let (server, store) = server();

        let mismatch = server
            .post("/cambiar-password")
            .form(&vec![
                ("nombre_usuario", "moderador"),
                ("contraseña_actual", "clave123"),
                ("nueva_contraseña", "nueva-clave"),
                ("confirmar_contraseña", "otra-clave"),
            ])
            .await;
        mismatch.assert_status(StatusCode::BAD_REQUEST);

        let too_short = server
            .post("/cambiar-password")
            .form(&vec![
                ("nombre_usuario", "moderador"),
                ("contraseña_actual", "clave123"),
                ("nueva_contraseña", "abc"),
                ("confirmar_contraseña", "abc"),
            ])
            .await;
        too_short.assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(store.write_count(), 0);
    }
}
