//! Database error types.
//!
//! `DbError` classifies every failure the persistence layer can
//! produce. Constraint violations are recognized from SQLite's error
//! messages, so uniqueness conflicts surface as typed errors without
//! any check-then-insert racing.

use thiserror::Error;

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity lookup by id (or key) found nothing
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A UNIQUE constraint rejected the write
    #[error("{field} already exists")]
    UniqueViolation { field: String },

    /// A FOREIGN KEY constraint rejected the write
    #[error("referenced row does not exist")]
    ForeignKeyViolation,

    /// A sale asked for more units than are on hand
    #[error("insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Could not open or reach the database
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Any other query failure
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Failure inside the layer that is not a query (hashing, encoding)
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    /// Shorthand for a typed not-found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Column name out of a SQLite UNIQUE violation message.
///
/// SQLite reports `UNIQUE constraint failed: users.username` (a comma
/// list for composite indexes). The part after the last dot of the
/// first entry is the field the caller cares about.
fn unique_violation_field(message: &str) -> String {
    message
        .rsplit_once(':')
        .map(|(_, cols)| cols)
        .unwrap_or(message)
        .split(',')
        .next()
        .unwrap_or(message)
        .rsplit('.')
        .next()
        .unwrap_or(message)
        .trim()
        .to_string()
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE constraint failed") {
                    DbError::UniqueViolation {
                        field: unique_violation_field(message),
                    }
                } else if message.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation
                } else {
                    DbError::QueryFailed(message.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionFailed("connection pool timed out".to_string())
            }
            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}
