//! # Domain Errors
//!
//! Every way an operator command can be turned down.

use std::time::Duration;

use mk_01_state_store::StoreError;
use mk_02_lease_lock::LeaseError;
use shared_types::PlayerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    /// The submitted deck had no items after trimming and deduplication.
    #[error("Deck is empty: enter at least one item")]
    EmptyDeck,

    /// Another context holds the lease; nothing was changed.
    #[error("Busy, try again (lease not acquired after {attempts} attempts)")]
    Busy { attempts: u32 },

    #[error("Reset not confirmed")]
    ResetNotConfirmed,

    #[error("Player {0} out of range")]
    PlayerOutOfRange(u8),

    /// The player already used every draw.
    #[error("{0} has reached the draw cap")]
    PlayerCapped(PlayerId),

    #[error("{player} is cooling down for another {remaining:?}")]
    CoolingDown { player: PlayerId, remaining: Duration },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<LeaseError> for ControlError {
    fn from(err: LeaseError) -> Self {
        match err {
            LeaseError::Timeout { attempts } => ControlError::Busy { attempts },
            LeaseError::Store(store) => ControlError::Store(store),
        }
    }
}

impl ControlError {
    /// Rejections the operator can simply retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ControlError::Busy { .. } | ControlError::CoolingDown { .. }
        )
    }
}
