use shared_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Player number outside `1..=4`.
    #[error("Player {0} out of range")]
    PlayerOutOfRange(u8),

    /// A state invariant does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<TypeError> for DrawError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidPlayer(raw) => DrawError::PlayerOutOfRange(raw),
            other => DrawError::InvariantViolation(other.to_string()),
        }
    }
}
