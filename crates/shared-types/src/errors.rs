//! # Error Types
//!
//! Errors raised while constructing or validating shared entities.

use thiserror::Error;

/// Errors from shared entity construction and invariant checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Player identifiers are 1-based and bounded by `MAX_PLAYERS`.
    #[error("Invalid player id {0}: expected 1..={max}", max = crate::MAX_PLAYERS)]
    InvalidPlayer(u8),

    /// Unrecognized draw mode label.
    #[error("Unknown draw mode: {0}")]
    UnknownMode(String),

    /// Unrecognized remote reset policy label.
    #[error("Unknown remote reset policy: {0}")]
    UnknownPolicy(String),

    /// A state invariant does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
