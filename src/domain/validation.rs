// ==========================================
// Depot Management - input validation
// ==========================================
// Runs before anything reaches the store; the Name column itself is
// unbounded.
// ==========================================

use thiserror::Error;

/// Maximum depot name length, in characters
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,

    #[error("name is too long: {actual} characters (max {max})")]
    NameTooLong { max: usize, actual: usize },
}

/// Validate a depot name and return it trimmed
pub fn validate_name(name: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let actual = trimmed.chars().count();
    if actual > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LENGTH,
            actual,
        });
    }

    Ok(trimmed.to_string())
}
