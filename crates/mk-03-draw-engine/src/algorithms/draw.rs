//! # Draw
//!
//! `(DrawState, request) -> (DrawState', SpinEvent)`, with no I/O. The caller
//! holds the lease, saves `state` and only then publishes `event`.
//!
//! ```text
//! Idle → Locked → { Miss | Picked | Reset+Picked | Reset+Miss } → Unlocked
//! ```

use shared_types::{DrawMode, DrawState, SpinEvent, COLOR_COUNT, PLACEHOLDER_CANDIDATE};
use tracing::debug;

use crate::algorithms::pick::pick_unique;
use crate::domain::{DrawOutcome, DrawRequest, Drawn, PickOutcome, MAX_PICK_ATTEMPTS};
use crate::ports::RandomSource;

pub fn draw(state: &DrawState, request: DrawRequest, rng: &dyn RandomSource) -> DrawOutcome {
    let player = request.player;
    if state.is_capped(player) {
        debug!(player_id = %player, "[mk-03] Player capped, no draw");
        return DrawOutcome::Capped;
    }

    let mut next = state.clone();
    next.mode = request.mode_override.unwrap_or(state.mode);

    let mut candidates: Vec<String> = next.available().into_iter().map(String::from).collect();
    let mut reset_occurred = false;
    if candidates.is_empty() && next.mode == DrawMode::Loop && !next.deck.is_empty() {
        next.used_items.clear();
        reset_occurred = true;
        candidates = next.deck.as_slice().to_vec();
    }

    let result = match pick_unique(&candidates, &next.used_items, rng, MAX_PICK_ATTEMPTS) {
        PickOutcome::Picked(item) => {
            next.used_items.insert(item.clone());
            Some(item)
        }
        PickOutcome::DegradedMiss => None,
    };

    let color_index = (next.player_counts.get(player) % COLOR_COUNT) as u8;
    next.player_counts.increment(player);

    let candidate_set = if next.deck.is_empty() {
        vec![PLACEHOLDER_CANDIDATE.to_string()]
    } else {
        next.deck.as_slice().to_vec()
    };

    let event = SpinEvent {
        player_id: player,
        is_miss: result.is_none(),
        result_value: result,
        color_index,
        timestamp: request.timestamp,
        candidate_set,
        reset_occurred,
        mode: next.mode,
    };

    let drawn = Drawn::new(next, event);
    debug!(
        player_id = %player,
        kind = %drawn.kind,
        result = ?drawn.event.result_value,
        "[mk-03] Draw computed"
    );
    DrawOutcome::Drawn(drawn)
}
