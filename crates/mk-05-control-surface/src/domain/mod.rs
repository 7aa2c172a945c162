//! # Domain Module
//!
//! Control surface configuration, errors, status summary and the rules for
//! applying foreign events to local state.

pub mod config;
pub mod errors;
pub mod replica;
pub mod status;

pub use config::*;
pub use errors::*;
pub use replica::*;
pub use status::*;
