//! Error taxonomy shared by the auth core, the storage adapters and the
//! HTTP boundary.

use thiserror::Error;

/// Result type used across the domain layer.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain-level error.
///
/// Each variant maps to exactly one HTTP status at the API boundary:
/// validation and conflicts to 400, missing records to 404, failed logins
/// to 401, storage trouble to 500. `Authentication` deliberately carries no
/// detail — the caller must not learn which factor failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was missing/blank, or a referenced role is unknown.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No matching active record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate identifier, or a delete blocked by dependent records.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Resolution or verification failed during login. One message for
    /// both cases.
    #[error("invalid credentials")]
    Authentication,

    /// The storage collaborator failed. `message`, `code` and `query` are
    /// logged at the request boundary and withheld from the response body.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        code: Option<String>,
        query: String,
    },

    /// Unexpected process-internal failure (e.g. the hashing backend).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
