//! # Lease Lock (mk-02)
//!
//! Serializes draws across contexts that share nothing but a key/value
//! store, tolerating holders that crash while holding the lease.
//!
//! ## Lease Record
//!
//! Stored under its own key as `{ "id": string, "acquiredAt": epoch-ms }`.
//! At most one non-expired lease is valid; expiry is judged by wall clock at
//! read time against a fixed TTL (5 s).
//!
//! ## Rules
//!
//! | Operation | Rule |
//! |-----------|------|
//! | `acquire` | bounded read / claim / settle / verify loop under a fresh id |
//! | `release` | clears the record only if the stored id matches |

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ManualTimeSource, SystemTimeSource};
pub use domain::{LeaseConfig, LeaseError, LeaseId};
pub use ports::TimeSource;
pub use service::LeaseLock;
