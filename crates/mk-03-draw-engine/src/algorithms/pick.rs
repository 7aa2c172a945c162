//! Duplicate-safe uniform pick.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::PickOutcome;
use crate::ports::RandomSource;

/// Pick uniformly from `candidates`, rejecting anything already in `used`.
///
/// Candidates are normally `deck - used`, so a collision means the state
/// changed underneath us. Each collision is retried; after `max_attempts`
/// the pick degrades to a miss instead of ever returning a duplicate.
pub fn pick_unique(
    candidates: &[String],
    used: &BTreeSet<String>,
    rng: &dyn RandomSource,
    max_attempts: u32,
) -> PickOutcome {
    if candidates.is_empty() {
        return PickOutcome::DegradedMiss;
    }

    for attempt in 1..=max_attempts {
        let item = &candidates[rng.random_usize(candidates.len())];
        if !used.contains(item) {
            return PickOutcome::Picked(item.clone());
        }
        warn!(attempt, item = %item, "[mk-03] Duplicate pick candidate, retrying");
    }

    warn!(max_attempts, "[mk-03] Duplicate pick unresolved, degrading to miss");
    PickOutcome::DegradedMiss
}
