//! # Persisted Record
//!
//! The on-disk shape of the shared draw state and the rules for folding it
//! into a context's in-memory copy.
//!
//! ## Merge Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `deck`, `mode`, `playerCounts` | persisted value wins |
//! | `usedItems` | set union of memory and disk, restricted to the deck |
//! | `layout` | field-wise overwrite |
//!
//! A record without a `deck` leaves the game fields in memory untouched.
//! The union keeps items a context learned from the replication channel but
//! whose originating context has not flushed yet.

use std::collections::BTreeSet;

use serde::Deserialize;
use shared_types::{Deck, DrawMode, DrawState, Layout, PlayerCounts};

/// Key of the shared draw state record.
pub const STATE_KEY: &str = "obs_mk_lottery_data_v1";

/// Key of the lease record.
pub const LEASE_KEY: &str = "obs_mk_spin_lock";

/// A persisted record as read back, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub deck: Option<Deck>,
    pub used_items: Option<BTreeSet<String>>,
    pub player_counts: Option<PlayerCounts>,
    pub mode: Option<DrawMode>,
    pub layout: Option<PartialLayout>,
}

/// Layout fields as persisted; missing fields keep the in-memory value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PartialLayout {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
}

impl PartialLayout {
    fn apply(self, layout: &mut Layout) {
        if let Some(x) = self.x {
            layout.x = x;
        }
        if let Some(y) = self.y {
            layout.y = y;
        }
        if let Some(scale) = self.scale {
            layout.scale = scale;
        }
    }
}

/// What a merge did to the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    /// The record carried game fields and they were applied.
    pub game_applied: bool,
    /// Used items known only in memory that survived the union.
    pub kept_local: usize,
    /// Used items dropped because the persisted deck no longer has them.
    pub dropped_stray: usize,
}

impl PersistedState {
    /// Parse a raw record.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Fold this record into `current` following the merge rules.
    pub fn merge_into(self, current: &mut DrawState) -> MergeSummary {
        let mut summary = MergeSummary::default();

        if let Some(deck) = self.deck {
            let mut merged = self.used_items.unwrap_or_default();
            for item in &current.used_items {
                if merged.insert(item.clone()) {
                    summary.kept_local += 1;
                }
            }

            current.deck = deck;
            if let Some(mode) = self.mode {
                current.mode = mode;
            }
            if let Some(counts) = self.player_counts {
                current.player_counts = counts;
            }

            let before = merged.len();
            merged.retain(|item| current.deck.contains(item));
            summary.dropped_stray = before - merged.len();
            current.used_items = merged;
            summary.game_applied = true;
        }

        if let Some(layout) = self.layout {
            layout.apply(&mut current.layout);
        }

        summary
    }
}
