// =============================================================================
// TABLES
// =============================================================================

/// Uploaded plant images and their moderation metadata
pub const TABLE_IMAGES: &str = "imagenes";

/// Newsletter subscribers
pub const TABLE_SUBSCRIBERS: &str = "suscriptores";

/// Administrator accounts
pub const TABLE_ADMINS: &str = "usuarios_administradores";

// =============================================================================
// STORAGE
// =============================================================================

/// Folder inside the bucket where uploaded images live
pub const PUBLIC_FOLDER: &str = "public";

/// Content types accepted for plant images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Extension used when the uploaded filename has none
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

pub fn unsupported_image_type_message() -> String {
    format!(
        "Tipo de archivo no soportado. Use: {}",
        ALLOWED_IMAGE_TYPES.join(", ")
    )
}

// =============================================================================
// AUTH
// =============================================================================

/// Token lifetime used when the caller does not pick one
pub const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_image_types() {
        assert!(is_image_type_allowed("image/jpeg"));
        assert!(is_image_type_allowed("image/png"));
        assert!(is_image_type_allowed("image/webp"));
        assert!(!is_image_type_allowed("image/gif"));
        assert!(!is_image_type_allowed("application/pdf"));
        assert!(!is_image_type_allowed("IMAGE/PNG"));
    }
}
