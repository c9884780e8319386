//! Error types for the directory service

use common::error::DatabaseError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error raised by a directory operation
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Connection acquisition or statement execution failed
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A row did not have the shape the projection expects
    #[error("Row mapping error: {0}")]
    Mapping(String),

    /// The password could not be hashed or parsed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// The operation needs a persisted profile id
    #[error("Profile has no id")]
    MissingId,
}

impl DirectoryError {
    /// Classify a failed statement, separating decode problems from store errors
    pub fn from_query(err: SqlxError) -> Self {
        match err {
            SqlxError::ColumnNotFound(column) => {
                DirectoryError::Mapping(format!("column not found: {}", column))
            }
            e @ (SqlxError::ColumnDecode { .. } | SqlxError::Decode(_)) => {
                DirectoryError::Mapping(e.to_string())
            }
            e => DirectoryError::Database(DatabaseError::Query(e)),
        }
    }

    /// Wrap a failure to obtain a connection
    pub fn from_connection(err: SqlxError) -> Self {
        DirectoryError::Database(DatabaseError::Connection(err))
    }

    /// Short label used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            DirectoryError::Database(_) => "store",
            DirectoryError::Mapping(_) => "mapping",
            DirectoryError::PasswordHash(_) => "password",
            DirectoryError::MissingId => "input",
        }
    }

    /// Whether the failure came from the store itself
    pub fn is_store_error(&self) -> bool {
        matches!(self, DirectoryError::Database(_))
    }
}

/// Type alias for directory results
pub type DirectoryResult<T> = Result<T, DirectoryError>;
