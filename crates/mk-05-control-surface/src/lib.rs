//! # Control Surface (mk-05)
//!
//! Operator commands against the shared game, and reconciliation of what
//! other contexts publish.
//!
//! ## Commands
//!
//! | Command | Effect | Published |
//! |---------|--------|-----------|
//! | `submit_deck(text, mode)` | dedup deck, new game | `RESET_GAME`, `SYNC_STATE` |
//! | `trigger_draw(player)` | one draw | `SPIN` |
//! | `reset_game(confirm)` | clear used items and counts | `RESET_GAME` |
//! | `update_layout(x, y, scale)` | save layout | `UPDATE_CONFIG` |
//! | `reload_display()` | hard refresh displays | `RELOAD`, then `UPDATE_CONFIG` |
//!
//! Every store write happens under the lease, after a merge-load, and is
//! saved before anything is published.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod service;

pub use domain::{
    apply_foreign_reset, apply_foreign_spin, ControlConfig, ControlError, DeckStatus,
    ReplicaEffect, DEFAULT_COOLDOWN, DEFAULT_RELAYOUT_DELAY,
};
pub use service::{ControlSurface, DrawReport};
