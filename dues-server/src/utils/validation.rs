//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the CRUD
//! handlers. The stores receive already-trimmed, validated text.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Names: adherent nom/prenom, cotisation nom
pub const MAX_NAME_LEN: usize = 200;

/// Free-text descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty after trimming and within
/// the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_is_rejected() {
        assert!(validate_required_text("  ", "nom", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Dupont", "nom", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn oversized_text_is_rejected() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "nom", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "nom", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&None, "nom", MAX_NAME_LEN).is_ok());
    }
}
