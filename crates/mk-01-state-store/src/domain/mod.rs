//! # Domain Module
//!
//! Persisted record shape, merge rules and errors for the State Store.

pub mod errors;
pub mod record;

pub use errors::*;
pub use record::*;
