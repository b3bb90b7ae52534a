//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest display name accepted for teams and players.
const MAX_NAME_LENGTH: usize = 64;

/// Validates that a display name is non-blank and at most 64 characters.
///
/// # Examples
///
/// ```ignore
/// validate_display_name("AC Milan")  // Ok
/// validate_display_name("   ")       // Err - blank
/// ```
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(
            format!(
                "Name must be at most {MAX_NAME_LENGTH} characters (got {})",
                name.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name_valid() {
        assert!(validate_display_name("AC Milan").is_ok());
        assert!(validate_display_name("N'Golo Kanté").is_ok());
        assert!(validate_display_name("A").is_ok());
    }

    #[test]
    fn test_validate_display_name_blank() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_display_name_too_long() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_display_name(&long).is_err());
        let boundary = "a".repeat(MAX_NAME_LENGTH);
        assert!(validate_display_name(&boundary).is_ok());
    }
}
