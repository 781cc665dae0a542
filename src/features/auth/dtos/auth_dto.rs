use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Login form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginFormDto {
    pub nombre_usuario: String,
    #[serde(rename = "contraseña")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub success: bool,
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
    pub nombre_usuario: String,
    pub id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyTokenQuery {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyTokenResponseDto {
    pub valid: bool,
    pub nombre_usuario: String,
    pub id: i64,
}

/// Password change form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordFormDto {
    #[validate(length(min = 1, message = "nombre_usuario es requerido"))]
    pub nombre_usuario: String,

    #[serde(rename = "contraseña_actual")]
    #[validate(length(min = 1, message = "contraseña_actual es requerida"))]
    pub current_password: String,

    #[serde(rename = "nueva_contraseña")]
    #[validate(length(
        min = 6,
        message = "La nueva contraseña debe tener al menos 6 caracteres"
    ))]
    pub new_password: String,

    #[serde(rename = "confirmar_contraseña")]
    #[validate(must_match(other = "new_password", message = "Las contraseñas no coinciden"))]
    pub confirm_password: String,
}
