//! # Lease Lock Service
//!
//! Advisory mutual exclusion built only from reads and writes on the shared
//! key/value store.
//!
//! ## Acquire
//!
//! ```text
//! ┌──────────┐ active  ┌─────────┐
//! │   read   │───────→│ backoff │──→ next attempt
//! └──────────┘         └─────────┘
//!      │ absent/expired     ↑
//!      ▼                    │ foreign id
//! ┌──────────┐  settle ┌──────────┐
//! │  claim   │───────→│  verify  │──→ own id: acquired
//! └──────────┘         └──────────┘
//! ```
//!
//! This is a lease, not a mutex. Two contexts may both believe they hold it
//! when the settle delay is shorter than store write propagation; the draw
//! engine's duplicate check bounds the damage.

use std::sync::Arc;

use mk_01_state_store::{SharedStore, LEASE_KEY};
use shared_types::Lease;
use tracing::{debug, info, warn};

use crate::domain::{LeaseConfig, LeaseError, LeaseId};
use crate::ports::TimeSource;

pub struct LeaseLock {
    store: SharedStore,
    clock: Arc<dyn TimeSource>,
    config: LeaseConfig,
    key: String,
}

impl LeaseLock {
    pub fn new(store: SharedStore, clock: Arc<dyn TimeSource>, config: LeaseConfig) -> Self {
        Self {
            store,
            clock,
            config,
            key: LEASE_KEY.to_string(),
        }
    }

    /// Use a different record key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    /// Claim the lease under a fresh id.
    ///
    /// # Errors
    ///
    /// `LeaseError::Timeout` once `max_attempts` iterations found the lease
    /// busy or lost the claim. The caller must not touch shared state then.
    pub async fn acquire(&self) -> Result<LeaseId, LeaseError> {
        let id = LeaseId::generate();

        for attempt in 1..=self.config.max_attempts {
            let now = self.clock.now_ms();
            if let Some(current) = self.read()? {
                if current.is_active(now, self.config.ttl_ms) {
                    debug!(
                        attempt,
                        holder = %current.holder_id,
                        "[mk-02] Lease busy, backing off"
                    );
                    tokio::time::sleep(self.config.backoff).await;
                    continue;
                }
                debug!(holder = %current.holder_id, "[mk-02] Taking over expired lease");
            }

            self.write(&Lease {
                holder_id: id.as_str().to_string(),
                acquired_at: now,
            })?;

            tokio::time::sleep(self.config.settle).await;

            match self.read()? {
                Some(stored) if stored.holder_id == id.as_str() => {
                    debug!(attempt, holder = %id, "[mk-02] Lease acquired");
                    return Ok(id);
                }
                other => {
                    debug!(
                        attempt,
                        winner = ?other.map(|l| l.holder_id),
                        "[mk-02] Lost lease race"
                    );
                    tokio::time::sleep(self.config.backoff).await;
                }
            }
        }

        warn!(
            attempts = self.config.max_attempts,
            "[mk-02] Lease acquisition timed out"
        );
        Err(LeaseError::Timeout {
            attempts: self.config.max_attempts,
        })
    }

    /// Clear the lease if `id` still holds it.
    ///
    /// Returns `false` when the lease was already taken over by someone
    /// else (or is gone); the stored record is then left alone.
    pub fn release(&self, id: &LeaseId) -> Result<bool, LeaseError> {
        match self.read()? {
            Some(stored) if stored.holder_id == id.as_str() => {
                self.store.delete(&self.key)?;
                debug!(holder = %id, "[mk-02] Lease released");
                Ok(true)
            }
            Some(stored) => {
                info!(
                    holder = %id,
                    current = %stored.holder_id,
                    "[mk-02] Lease reassigned before release, leaving it"
                );
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// The currently stored lease, whether or not it has expired.
    pub fn current(&self) -> Result<Option<Lease>, LeaseError> {
        self.read()
    }

    fn read(&self) -> Result<Option<Lease>, LeaseError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(lease) => Ok(Some(lease)),
            Err(e) => {
                warn!(key = %self.key, error = %e, "[mk-02] Unreadable lease record, treating as free");
                Ok(None)
            }
        }
    }

    fn write(&self, lease: &Lease) -> Result<(), LeaseError> {
        let raw = serde_json::to_string(lease).map_err(mk_01_state_store::StoreError::from)?;
        self.store.put(&self.key, &raw)?;
        Ok(())
    }
}
