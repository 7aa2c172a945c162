//! Error types for the Lease Lock subsystem.

use mk_01_state_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseError {
    /// Every attempt found the lease held or lost the claim race.
    #[error("Lease not acquired after {attempts} attempts")]
    Timeout {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The key/value backend failed.
    #[error("Lease store error: {0}")]
    Store(#[from] StoreError),
}

impl LeaseError {
    /// Contention rather than a broken backend.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, LeaseError::Timeout { .. })
    }
}
