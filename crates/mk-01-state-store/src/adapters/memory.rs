//! In-memory key/value store.
//!
//! Shared between contexts by cloning the `Arc` that wraps it, which models
//! several tabs of one browser profile sharing a single storage area.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::StoreError;
use crate::ports::KeyValueStore;

#[derive(Debug, Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.data.write().remove(key);
        Ok(())
    }
}
