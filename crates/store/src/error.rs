//! Store error types

use thiserror::Error;

/// Errors from document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded document field failed to (de)serialize
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid data
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Create an invalid data error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
