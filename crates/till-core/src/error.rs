//! Validation error types for till-core.
//!
//! Every validator in [`crate::validation`] returns one of these
//! variants. The server layer maps them onto its RPC error envelope,
//! so the messages here are written to be shown to an operator as-is.

use thiserror::Error;

/// Errors produced by input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was missing or blank
    #[error("{field} is required")]
    Required { field: String },

    /// String value below the minimum length
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// String value above the maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value that must be strictly positive was zero or negative
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Numeric value that must not be negative was negative
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value outside its allowed range
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value that does not match its expected format
    #[error("{field} is not valid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A sale was submitted without any line items
    #[error("a sale must contain at least one item")]
    EmptySale,

    /// A sale exceeded the line-item limit
    #[error("a sale cannot contain more than {max} items")]
    TooManyItems { max: usize },
}

impl ValidationError {
    /// Create a `Required` error for the given field
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }

    /// Create an `InvalidFormat` error for the given field
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for validation functions
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::required("username");
        assert_eq!(err.to_string(), "username is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be greater than zero");

        let err = ValidationError::Negative {
            field: "discount_cents".to_string(),
        };
        assert_eq!(err.to_string(), "discount_cents must not be negative");
    }

    #[test]
    fn test_sale_shape_errors() {
        assert_eq!(
            ValidationError::EmptySale.to_string(),
            "a sale must contain at least one item"
        );
        assert_eq!(
            ValidationError::TooManyItems { max: 100 }.to_string(),
            "a sale cannot contain more than 100 items"
        );
    }
}
