//! Error types and utilities for database operations.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, DatabaseErrorKind, Error};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for database operations.
pub type PgResult<T> = Result<T, PgError>;

/// Comprehensive error type for all PostgreSQL database operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database operation timed out.
    #[error("database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Database migration operation failed.
    #[error("database migration error: {0}")]
    Migration(BoxError),

    /// Database query execution failed.
    #[error("database query error: {0}")]
    Query(#[from] Error),

    /// Unexpected error occurred.
    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns whether this error is a not-found result.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PgError::Query(Error::NotFound))
    }

    /// Returns whether this error is a unique constraint violation.
    ///
    /// Used to surface "email already in use" style conflicts with a
    /// user-facing message instead of a generic failure.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            ))
        )
    }

    /// Extracts the constraint name from a constraint violation error.
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(Error::DatabaseError(_, info)) = self else {
            return None;
        };
        info.constraint_name()
    }
}

impl From<DeadpoolError> for PgError {
    fn from(err: DeadpoolError) -> Self {
        match err {
            DeadpoolError::Timeout(timeout_type) => PgError::Timeout(timeout_type),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(err)) => {
                PgError::Connection(err)
            }
            DeadpoolError::Backend(DieselPoolError::QueryError(err)) => PgError::Query(err),
            other => PgError::Unexpected(format!("connection pool error: {other}").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected() {
        let err = PgError::Query(Error::NotFound);
        assert!(err.is_not_found());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn config_error_displays_message() {
        let err = PgError::Config("bad url".to_string());
        assert!(err.to_string().contains("bad url"));
    }
}
