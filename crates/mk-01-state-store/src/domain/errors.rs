//! # Domain Errors
//!
//! Error types for the State Store subsystem.

use thiserror::Error;

/// State Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing medium could not be read or written.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing medium itself is unreadable (not a single bad record).
    #[error("Store corrupt at {location}: {reason}")]
    Corrupt {
        /// File path or key that failed.
        location: String,
        /// Parser message.
        reason: String,
    },
}
