//! # State Store (mk-01)
//!
//! Durable key/value persistence of the single shared `DrawState` record.
//!
//! ## Operations
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `load` | merge the persisted record into memory; `usedItems` is a set union |
//! | `save` | overwrite the full record, then notify local observers |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - persisted record shape, merge rules, errors
//! - `ports/` - `KeyValueStore` outbound port
//! - `adapters/` - in-memory and file-backed stores
//! - `service.rs` - `StateStore`
//!
//! ## Usage
//!
//! ```ignore
//! use mk_01_state_store::{InMemoryKVStore, StateStore};
//!
//! let store = StateStore::new(Arc::new(InMemoryKVStore::new()));
//! let mut state = DrawState::new();
//! store.load(&mut state)?;
//! store.save(&state)?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use domain::{MergeSummary, PersistedState, StoreError, LEASE_KEY, STATE_KEY};
pub use ports::{KeyValueStore, SharedStore};
pub use service::{LoadReport, StateStore};
