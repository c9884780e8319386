//! Custom error types for the common library
//!
//! This module defines the database error type shared by every crate that
//! talks to the profiles store.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while acquiring a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = DatabaseError::Connection(SqlxError::PoolTimedOut);
        assert!(err.to_string().starts_with("Database connection error"));
    }

    #[test]
    fn test_query_error_display_keeps_source_message() {
        let err = DatabaseError::Query(SqlxError::Protocol("unexpected message".to_string()));
        assert!(err.to_string().starts_with("Database query error"));
        assert!(err.to_string().contains("unexpected message"));
    }
}
