//! # Replica Reconciliation
//!
//! How a control surface folds events published by *other* contexts into
//! its in-memory state. Nothing here saves: the publisher already committed
//! the fact to the store, and the next load merges it anyway.

use shared_types::{DrawState, RemoteResetPolicy, SpinEvent};

/// What a foreign spin changed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplicaEffect {
    pub reset_applied: bool,
    pub item_recorded: bool,
}

/// Apply a foreign spin.
///
/// The reset flag is gated by `policy` against the local stored mode, so an
/// exhaust-mode surface never accepts a cycle reset under `LoopOnly`. A
/// result the local deck does not know is not recorded.
pub fn apply_foreign_spin(
    state: &mut DrawState,
    spin: &SpinEvent,
    policy: RemoteResetPolicy,
) -> ReplicaEffect {
    let mut effect = ReplicaEffect::default();

    if spin.reset_occurred && policy.honors(state.mode) {
        state.used_items.clear();
        effect.reset_applied = true;
    }

    if let Some(item) = &spin.result_value {
        if state.deck.contains(item) && !state.used_items.contains(item) {
            state.used_items.insert(item.clone());
            effect.item_recorded = true;
        }
    }

    state.player_counts.increment(spin.player_id);
    effect
}

/// Apply a foreign `RESET_GAME`.
pub fn apply_foreign_reset(state: &mut DrawState) {
    state.reset_game();
}
