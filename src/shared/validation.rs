use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::DEFAULT_IMAGE_EXTENSION;

lazy_static! {
    /// File extensions we are willing to carry into a storage path
    /// - Valid: "jpg", "PNG", "webp", "jpeg2000"
    /// - Invalid: "", "tar.gz", "../x", "j p g"
    pub static ref EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap();
}

/// Extension taken from the part after the last dot, `jpg` when missing or unsafe
pub fn image_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if EXTENSION_REGEX.is_match(ext) => ext.to_string(),
        _ => DEFAULT_IMAGE_EXTENSION.to_string(),
    }
}

/// Loose email check: must contain `@` and `.`
pub fn looks_like_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("rosa.png"), "png");
        assert_eq!(image_extension("foto.final.JPEG"), "JPEG");
        assert_eq!(image_extension("sin_extension"), "jpg");
        assert_eq!(image_extension("trailing."), "jpg");
        assert_eq!(image_extension("evil.p/ng"), "jpg");
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("ana@example.com"));
        assert!(!looks_like_email("ana.example.com"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email(""));
    }
}
