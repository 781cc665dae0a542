use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{ChangePasswordFormDto, LoginResponseDto};
use crate::features::auth::model::{AdminRecord, AuthenticatedAdmin};
use crate::features::auth::services::TokenService;
use crate::modules::supabase::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::TABLE_ADMINS;
use crate::shared::types::MessageResponse;

const USERNAME_COLUMN: &str = "nombre de usuario";
const INVALID_CREDENTIALS: &str = "Credenciales incorrectas";

/// Admin login, token verification and password changes
pub struct AuthService {
    store: Arc<dyn TableStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn TableStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    async fn find_admin(&self, query: Query) -> Result<Option<AdminRecord>> {
        let rows = self.store.select(TABLE_ADMINS, query.limit(1)).await?;
        Ok(decode_rows::<AdminRecord>(rows)?.into_iter().next())
    }

    /// Runs on the blocking pool
    async fn password_matches(password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?;

        // A malformed stored hash counts as a mismatch
        Ok(verified.unwrap_or_else(|e| {
            warn!("Stored password hash could not be checked: {}", e);
            false
        }))
    }

    async fn hash_password(password: &str) -> Result<String> {
        let password = password.to_string();

        tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Admin matching `username` whose hash accepts `password`
    async fn authenticate(&self, username: &str, password: &str) -> Result<(i64, String)> {
        let admin = self
            .find_admin(Query::new().eq(USERNAME_COLUMN, username))
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let (Some(id), Some(hash)) = (admin.id, admin.password_hash.as_deref()) else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !Self::password_matches(password, hash).await? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let name = admin.username.unwrap_or_else(|| username.to_string());
        Ok((id, name))
    }

    async fn touch(&self, id: i64, mut changes: serde_json::Value) -> Result<()> {
        changes["actualizado_at"] = json!(Utc::now().to_rfc3339());
        self.store
            .update(TABLE_ADMINS, &changes, &[Filter::eq("id", id)])
            .await?;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponseDto> {
        let (id, name) = self.authenticate(username, password).await?;

        let access_token = self
            .tokens
            .issue(&name, id, Some(self.tokens.login_lifetime()))?;
        self.touch(id, json!({})).await?;

        info!("Admin {} logged in", name);

        Ok(LoginResponseDto {
            success: true,
            access_token,
            token_type: "bearer".to_string(),
            nombre_usuario: name,
            id,
        })
    }

    /// Decode `token` and confirm its admin still exists
    pub async fn verify_token(&self, token: &str) -> Result<AuthenticatedAdmin> {
        let claims = self.tokens.decode(token)?;

        let (Some(username), Some(id)) = (claims.sub, claims.id) else {
            return Err(AppError::Unauthorized("Token inválido".to_string()));
        };

        if self.find_admin(Query::new().eq("id", id)).await?.is_none() {
            return Err(AppError::Unauthorized("Usuario no encontrado".to_string()));
        }

        Ok(AuthenticatedAdmin { id, username })
    }

    pub async fn change_password(&self, form: ChangePasswordFormDto) -> Result<MessageResponse> {
        let (id, name) = self
            .authenticate(&form.nombre_usuario, &form.current_password)
            .await?;

        let hash = Self::hash_password(&form.new_password).await?;
        self.touch(id, json!({ "contraseña_hash": hash })).await?;

        info!("Admin {} changed their password", name);

        Ok(MessageResponse::ok("Contraseña actualizada correctamente"))
    }
}
