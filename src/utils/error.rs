//! Application error taxonomy
//!
//! Two layers of errors exist in the crate:
//! - [`RepoError`](crate::db::repository::RepoError) at the storage seam
//! - [`AppError`] at the service seam (this module)
//!
//! # Categories
//!
//! | Variant | Meaning | State mutated? |
//! |---------|---------|----------------|
//! | `Validation` | malformed input | no |
//! | `NotFound` | referenced entity absent | no |
//! | `Conflict` | allocation denied, human-readable reason | no |
//! | `Database` | storage failure | compensated by the caller |
//! | `Internal` | invariant breached inside the engine | compensated |

use crate::db::repository::RepoError;

/// Service-level error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for service operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
