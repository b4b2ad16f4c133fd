//! Error types for the sync client.

use crate::transport::TransportError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The remote answered with a non-2xx status.
    #[error("bad status code: {0}")]
    BadStatus(u16),

    /// No usable remote address.
    #[error("missing or invalid url: {0}")]
    MissingUrl(String),

    /// Response body does not match the expected wire shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request payload could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Timeout.
    #[error("operation timed out")]
    Timeout,
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::BadStatus(_) => true,
            SyncError::Timeout => true,
            _ => false,
        }
    }
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::BadStatusCode(status) => SyncError::BadStatus(status),
            TransportError::Network(message) => SyncError::transport_retryable(message),
            TransportError::MissingUrl => SyncError::MissingUrl("rejected by transport".into()),
        }
    }
}
