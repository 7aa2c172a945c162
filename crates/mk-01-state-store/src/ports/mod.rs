//! # Ports
//!
//! Driven ports of the State Store.

pub mod outbound;

pub use outbound::*;
