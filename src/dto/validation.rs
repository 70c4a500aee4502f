//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a string still has content after trimming whitespace.
///
/// Request DTOs use this instead of a plain length bound so that
/// whitespace-only submissions are rejected the same way empty ones are.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must not be blank".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank_accepts_content() {
        assert!(validate_not_blank("Rocketeers").is_ok());
        assert!(validate_not_blank("  padded  ").is_ok());
    }

    #[test]
    fn test_validate_not_blank_rejects_empty_and_whitespace() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }
}
