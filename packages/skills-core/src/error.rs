//! Skill operation errors.

use thiserror::Error;

/// Result type for skill operations.
pub type Result<T> = std::result::Result<T, SkillError>;

/// Errors raised by validation and by skill stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkillError {
    /// No skill is stored under the key
    #[error("Skill not found")]
    NotFound { key: String },

    /// Key in a PUT body differs from the key in the path
    #[error("Key does not match")]
    KeyMismatch { path: String, body: String },

    /// Key is empty or cannot be used as a path segment
    #[error("Invalid key: {reason}")]
    InvalidKey { reason: String },

    /// Backend failure (connection, query, pool)
    #[error("Storage error: {0}")]
    Storage(String),

    /// No pooled connection became available in time
    #[error("Operation timeout")]
    Timeout,
}

impl SkillError {
    /// Shorthand for a `NotFound` error on `key`.
    pub fn not_found(key: &str) -> Self {
        SkillError::NotFound {
            key: key.to_string(),
        }
    }
}

impl From<postgres::Error> for SkillError {
    fn from(err: postgres::Error) -> Self {
        SkillError::Storage(err.to_string())
    }
}

impl From<r2d2::Error> for SkillError {
    fn from(err: r2d2::Error) -> Self {
        SkillError::Storage(format!("connection pool: {}", err))
    }
}
