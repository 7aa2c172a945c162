//! # State Store Service
//!
//! Load-with-merge and save-overwrite of the single shared `DrawState`
//! record, plus local change notification.
//!
//! `save` notifies local observers through a `tokio::sync::watch` channel.
//! It never publishes on the replication channel; that is the caller's job.

use std::sync::Arc;

use shared_types::DrawState;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{MergeSummary, PersistedState, StoreError, STATE_KEY};
use crate::ports::SharedStore;

/// Result of a `load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// A record was found and merged.
    Loaded(MergeSummary),
    /// Nothing persisted yet; the in-memory state is unchanged.
    Missing,
    /// The record could not be parsed; the in-memory state is unchanged.
    Corrupt {
        /// Parser message.
        reason: String,
    },
}

impl LoadReport {
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadReport::Corrupt { .. })
    }
}

pub struct StateStore {
    store: SharedStore,
    key: String,
    observers: watch::Sender<DrawState>,
}

impl StateStore {
    /// State store over the default record key.
    pub fn new(store: SharedStore) -> Self {
        Self::with_key(store, STATE_KEY)
    }

    pub fn with_key(store: SharedStore, key: impl Into<String>) -> Self {
        let (observers, _) = watch::channel(DrawState::new());
        Self {
            store,
            key: key.into(),
            observers,
        }
    }

    /// Merge the persisted record into `state`.
    ///
    /// A corrupt record, or a backend reporting its medium corrupt, leaves
    /// `state` untouched and is reported, not raised. Any other backend
    /// failure is an error.
    pub fn load(&self, state: &mut DrawState) -> Result<LoadReport, StoreError> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(StoreError::Corrupt { location, reason }) => {
                warn!(%location, error = %reason, "[mk-01] Store medium corrupt, keeping memory");
                return Ok(LoadReport::Corrupt { reason });
            }
            Err(e) => return Err(e),
        };
        let Some(raw) = raw else {
            debug!(key = %self.key, "[mk-01] No persisted state");
            return Ok(LoadReport::Missing);
        };

        match PersistedState::parse(&raw) {
            Ok(record) => {
                let summary = record.merge_into(state);
                debug!(
                    key = %self.key,
                    kept_local = summary.kept_local,
                    dropped_stray = summary.dropped_stray,
                    "[mk-01] State merged from store"
                );
                Ok(LoadReport::Loaded(summary))
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "[mk-01] Persisted state corrupt, keeping memory");
                Ok(LoadReport::Corrupt {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Overwrite the full record, then notify local observers.
    pub fn save(&self, state: &DrawState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(state)?;
        self.store.put(&self.key, &raw)?;
        self.observers.send_replace(state.clone());
        debug!(
            key = %self.key,
            used = state.used_items.len(),
            deck = state.deck.len(),
            "[mk-01] State saved"
        );
        Ok(())
    }

    /// Watch every state this store saves.
    pub fn subscribe(&self) -> watch::Receiver<DrawState> {
        self.observers.subscribe()
    }

    /// The key/value backend, shared with the lease lock.
    pub fn backend(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
