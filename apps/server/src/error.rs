//! The RPC error envelope.
//!
//! Every failure leaves the server as an [`ApiError`]: a stable
//! machine-readable code plus a human-readable message, serialized as
//! the JSON response body with the matching HTTP status. Lower-layer
//! errors convert in via `From`, so handlers just use `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;
use till_core::ValidationError;
use till_db::DbError;
use tracing::error;

/// Stable error codes exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    Unauthorized,
    Conflict,
    InsufficientStock,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope returned by every procedure
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Log the real cause, return a generic envelope. Internal detail
    /// never reaches a client.
    pub fn internal(detail: impl fmt::Display) -> Self {
        error!(detail = %detail, "internal error");
        Self::new(ErrorCode::Internal, "an internal error occurred")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                Self::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            DbError::UniqueViolation { field } => {
                Self::new(ErrorCode::Conflict, format!("{field} already exists"))
            }
            DbError::InsufficientStock {
                product,
                available,
                requested,
            } => Self::new(
                ErrorCode::InsufficientStock,
                format!("insufficient stock for {product}: {available} available, {requested} requested"),
            ),
            other => {
                error!(error = %other, "database error");
                Self::new(ErrorCode::DatabaseError, "a database error occurred")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InsufficientStock.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_serialize_screaming_snake() {
        let err = ApiError::validation("quantity must be greater than zero");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be greater than zero");

        let err = ApiError::from(DbError::InsufficientStock {
            product: "Cola".to_string(),
            available: 1,
            requested: 2,
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    }

    #[test]
    fn test_db_conversions() {
        let err = ApiError::from(DbError::not_found("Product", "p-1"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: p-1");

        let err = ApiError::from(DbError::UniqueViolation {
            field: "barcode".to_string(),
        });
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = ApiError::from(DbError::QueryFailed("boom".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        // Internal detail is replaced by a generic message
        assert!(!err.message.contains("boom"));
    }

    #[test]
    fn test_validation_conversion() {
        let err = ApiError::from(ValidationError::required("name"));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required");
    }
}
