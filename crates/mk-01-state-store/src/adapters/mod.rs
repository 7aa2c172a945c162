//! # Adapters
//!
//! Implementations of `KeyValueStore`.

pub mod file;
pub mod memory;

pub use file::FileBackedKVStore;
pub use memory::InMemoryKVStore;
