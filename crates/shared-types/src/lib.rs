//! # Shared Types Crate
//!
//! Domain entities shared by the control surface, the display surfaces and
//! every subsystem in between.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `DrawState` is the only contended record. It
//!   is persisted whole and replaced wholesale on reconfiguration.
//! - **Facts, not commands**: a `SpinEvent` describes a draw that has already
//!   been committed to the store. It is never mutated after publication.
//! - **Wire compatibility**: field names serialize in camelCase so the
//!   persisted record keeps the `{deck, usedItems, playerCounts, mode, layout}`
//!   shape.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
