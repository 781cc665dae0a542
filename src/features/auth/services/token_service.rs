use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AdminClaims;
use crate::shared::constants::DEFAULT_TOKEN_EXPIRE_MINUTES;

/// Issues and decodes HS256 admin access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire_minutes: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            expire_minutes: config.access_token_expire_minutes,
        }
    }

    /// Lifetime applied to login tokens
    pub fn login_lifetime(&self) -> Duration {
        Duration::minutes(self.expire_minutes)
    }

    /// Sign a token for `username`/`id`, valid for `lifetime` or 15 minutes
    pub fn issue(&self, username: &str, id: i64, lifetime: Option<Duration>) -> Result<String> {
        let lifetime =
            lifetime.unwrap_or_else(|| Duration::minutes(DEFAULT_TOKEN_EXPIRE_MINUTES));
        let claims = AdminClaims {
            sub: Some(username.to_string()),
            id: Some(id),
            exp: (Utc::now() + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry, returning the raw claims
    pub fn decode(&self, token: &str) -> Result<AdminClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Token inválido o expirado".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig {
            secret_key: secret.to_string(),
            access_token_expire_minutes: 30,
        })
    }

    #[test]
    fn test_issued_token_decodes_to_same_admin() {
        let tokens = service("s3cret");

        let token = tokens
            .issue("admin", 7, Some(tokens.login_lifetime()))
            .unwrap();
        let claims = tokens.decode(&token).unwrap();

        assert_eq!(claims.sub.as_deref(), Some("admin"));
        assert_eq!(claims.id, Some(7));
        let remaining = claims.exp - Utc::now().timestamp();
        assert!(remaining > 29 * 60 && remaining <= 30 * 60);
    }

    #[test]
    fn test_default_lifetime_is_fifteen_minutes() {
        let tokens = service("s3cret");

        let claims = tokens.decode(&tokens.issue("admin", 1, None).unwrap()).unwrap();

        let remaining = claims.exp - Utc::now().timestamp();
        assert!(remaining > 14 * 60 && remaining <= 15 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service("s3cret");

        let token = tokens
            .issue("admin", 1, Some(Duration::minutes(-1)))
            .unwrap();

        assert!(matches!(
            tokens.decode(&token),
            Err(AppError::Unauthorized(msg)) if msg == "Token inválido o expirado"
        ));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let tokens = service("s3cret");
        let forger = service("other");

        let genuine = tokens.issue("admin", 1, None).unwrap();
        let forged = forger.issue("admin", 1, None).unwrap();
        let (payload, _) = genuine.rsplit_once('.').unwrap();
        let (_, foreign_signature) = forged.rsplit_once('.').unwrap();
        let tampered = format!("{}.{}", payload, foreign_signature);

        assert!(tokens.decode(&tampered).is_err());
        assert!(tokens.decode(&forged).is_err());
        assert!(tokens.decode("not-a-token").is_err());
    }
}
