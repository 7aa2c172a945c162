//! # Outbound Ports (Driven Ports)
//!
//! The only coordination substrate the contexts share: a string-valued
//! key/value store. Each individual `get`/`put`/`delete` is atomic; nothing
//! spans two calls. Mutual exclusion is built on top in `mk-02-lease-lock`.
//!
//! Production: `FileBackedKVStore` (adapters/file.rs)
//! Testing: `InMemoryKVStore` (adapters/memory.rs)

use std::sync::Arc;

use crate::domain::StoreError;

/// Abstract interface for key/value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Handle shared by every component of one context.
pub type SharedStore = Arc<dyn KeyValueStore>;
