use crate::errors::{ApiError, Result};

// Input size ceilings per request class.
pub const MAX_TEXT_BYTES: usize = 10_000; // AI text completion
pub const MAX_CONTENT_BYTES: usize = 50_000; // summarization
pub const MAX_IMAGE_BYTES: usize = 5_000_000; // base64 image (~3.75MB decoded)
pub const MAX_SEQUENCE_BYTES: usize = 100_000; // biological sequences

const ALLOWED_IMAGE_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];
const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Rejects empty required fields before any quota or network cost.
pub fn require_field(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!("{} is required", label)));
    }
    Ok(())
}

pub fn require_size(value: &str, max: usize, label: &str) -> Result<()> {
    if value.len() > max {
        return Err(ApiError::InvalidArgument(format!(
            "{} exceeds maximum allowed size",
            label
        )));
    }
    Ok(())
}

/// Unrecognized image types are coerced to JPEG instead of rejected.
/// A deliberate leniency carried over from the product contract; the
/// downstream model call tolerates a mislabeled payload better than the
/// upload flow tolerates a hard failure.
pub fn coerce_image_mime(mime_type: &str) -> &str {
    if ALLOWED_IMAGE_MIME_TYPES.contains(&mime_type) {
        mime_type
    } else {
        DEFAULT_IMAGE_MIME_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_rejects_empty_and_whitespace() {
        assert!(require_field("", "Text").is_err());
        assert!(require_field("   ", "Text").is_err());
        assert!(require_field("hello", "Text").is_ok());
    }

    #[test]
    fn test_require_size_boundary() {
        let at_limit = "a".repeat(MAX_TEXT_BYTES);
        assert!(require_size(&at_limit, MAX_TEXT_BYTES, "Text").is_ok());

        let over_limit = "a".repeat(MAX_TEXT_BYTES + 1);
        let err = require_size(&over_limit, MAX_TEXT_BYTES, "Text").unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_required_field_fails_regardless_of_limit() {
        assert!(require_field("", "Sequences").is_err());
        assert!(require_size("", MAX_SEQUENCE_BYTES, "Sequences").is_ok());
    }

    #[test]
    fn test_mime_coercion() {
        assert_eq!(coerce_image_mime("image/png"), "image/png");
        assert_eq!(coerce_image_mime("image/webp"), "image/webp");
        assert_eq!(coerce_image_mime("application/pdf"), "image/jpeg");
        assert_eq!(coerce_image_mime(""), "image/jpeg");
    }
}
