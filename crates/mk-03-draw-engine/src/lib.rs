//! # Draw Engine (mk-03)
//!
//! Pure decision logic: given a `DrawState` and a player, produce the next
//! state and the `SpinEvent` describing the draw. Runs only while the lease
//! is held; holds no state between invocations.
//!
//! ## Algorithm
//!
//! 1. Capped player (20 draws): no event, no mutation.
//! 2. Resolve the mode; the operator's current selection wins.
//! 3. `available = deck - used`.
//! 4. Nothing available: `loop` clears the used set and starts a new cycle
//!    within this draw, `exhaust` misses.
//! 5. Uniform pick with a bounded duplicate re-check (3 attempts), degrading
//!    to a miss rather than ever emitting a duplicate.
//! 6. Record the pick, count the turn (a miss counts too).
//! 7. `colorIndex = count before increment % 20`.
//! 8. `candidateSet` is the full deck, or `["?"]` for an empty deck.
//!
//! ## Crate Structure
//!
//! - `domain/` - requests, outcomes, invariants, errors
//! - `ports/` - `RandomSource`
//! - `adapters/` - thread-local and fixed random sources
//! - `algorithms/` - `pick_unique`, `draw`
//! - `service.rs` - `DrawEngine`

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FixedRandomSource, ThreadRandomSource};
pub use algorithms::{draw, pick_unique};
pub use domain::{
    DrawError, DrawKind, DrawOutcome, DrawRequest, Drawn, PickOutcome, MAX_PICK_ATTEMPTS,
};
pub use ports::RandomSource;
pub use service::DrawEngine;
