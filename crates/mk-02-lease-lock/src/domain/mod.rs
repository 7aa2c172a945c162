//! # Domain Module
//!
//! Lease configuration, holder identity and errors.

pub mod config;
pub mod errors;

pub use config::*;
pub use errors::*;
