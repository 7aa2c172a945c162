//! # Domain Invariants
//!
//! Rules every draw must preserve.

use shared_types::{DrawMode, DrawState, SpinEvent, COLOR_COUNT};

use super::errors::DrawError;

/// Maximum attempts of the duplicate-safe pick before degrading to a miss.
pub const MAX_PICK_ATTEMPTS: u32 = 3;

/// Invariant: the post-state is internally consistent.
pub fn invariant_state_consistent(state: &DrawState) -> Result<(), DrawError> {
    state.check_invariants().map_err(DrawError::from)
}

/// Invariant: in `exhaust` mode the used set never shrinks between resets.
pub fn invariant_exhaust_monotonic(before: &DrawState, after: &DrawState) -> bool {
    after.mode != DrawMode::Exhaust || before.used_items.is_subset(&after.used_items)
}

/// Invariant: a published result is never one that was already used.
pub fn invariant_no_duplicate(before: &DrawState, event: &SpinEvent) -> bool {
    match &event.result_value {
        Some(item) => event.reset_occurred || !before.used_items.contains(item),
        None => event.is_miss,
    }
}

/// Invariant: the color index is in range.
pub fn invariant_color_in_range(event: &SpinEvent) -> bool {
    u32::from(event.color_index) < COLOR_COUNT
}
