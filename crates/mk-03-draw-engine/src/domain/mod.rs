//! # Domain Module
//!
//! Draw requests, outcomes, errors and invariants.

pub mod errors;
pub mod invariants;
pub mod outcome;

pub use errors::*;
pub use invariants::*;
pub use outcome::*;
