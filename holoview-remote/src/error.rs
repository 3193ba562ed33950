//! Error types for remote store operations.

use thiserror::Error;

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors that can occur talking to the remote object store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The addressed object does not exist.
    #[error("remote object not found: {0}")]
    NotFound(String),

    /// A conditional write targeted a version that is no longer current.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// Network or transport failure. Retryable at the caller's discretion.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error: {0}")]
    Api(String),

    /// Malformed service response body.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RemoteError {
    /// Returns true if this error is a version conflict on a conditional write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Conflict(_))
    }
}
