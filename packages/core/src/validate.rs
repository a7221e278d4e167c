//! Input validation shared by registration, profile and posting writes.

use thiserror::Error;

/// A rejected input, caught before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} is not a valid absolute URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("salary minimum {min} exceeds maximum {max}")]
    SalaryRange { min: u64, max: u64 },
    #[error("profile update does not match the {0} role")]
    RoleMismatch(crate::Role),
    #[error("{0}")]
    Invalid(String),
}

/// Require a non-blank string field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(())
}

/// Require an optional URL field to be absent, blank, or a well-formed absolute URL.
pub(crate) fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(url) if !url.trim().is_empty() && !crate::format::is_absolute_url(url) => {
            Err(ValidationError::InvalidUrl {
                field,
                value: url.to_string(),
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn salary_range(min: Option<u64>, max: Option<u64>) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(ValidationError::SalaryRange { min, max });
    }
    Ok(())
}
