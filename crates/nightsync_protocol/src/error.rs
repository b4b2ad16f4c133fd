//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while interpreting wire values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The tag is not part of the closed event taxonomy.
    #[error("unknown event type: {0:?}")]
    UnknownEventType(String),

    /// The timestamp is not valid RFC 3339 / ISO-8601.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// Offending input.
        value: String,
        /// Parser message.
        reason: String,
    },
}
