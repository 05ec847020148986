//! Error types for the API engine and its connections.

use std::io;

use thiserror::Error;

/// Errors surfaced while serving API connections.
///
/// None of these reach the client as text: protocol-level rejections are
/// [`Reply`](super::Reply) values. An `ApiError` either maps to an `error`
/// reply (internal failures) or ends the connection (transport failures).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Reading from or writing to the client failed.
    #[error("connection I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A request line exceeded the configured limit.
    #[error("request exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Limit in bytes.
        max_size: usize,
    },

    /// Internal error (e.g. poisoned state lock).
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Builds an [`ApiError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
