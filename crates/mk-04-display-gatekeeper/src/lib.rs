//! # Display Gatekeeper (mk-04)
//!
//! Display-side protection against rendering the same won item twice, even
//! when the replication or state layers momentarily disagree.
//!
//! ## Gate Rule
//!
//! On a `SPIN`: a honored `resetOccurred` clears the local seen-set first.
//! A result already in the seen-set is rendered as a miss; otherwise it is
//! added. Purely local and idempotent, never written back to the store.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod service;

pub use domain::{DisplayAction, GateVerdict, Gatekeeper, RenderedSpin};
pub use service::DisplaySurface;
