use std::fmt;

use shared_types::{DrawMode, DrawState, PlayerId};

/// Operator-facing summary of the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckStatus {
    pub mode: DrawMode,
    pub total: usize,
    /// Items left in the current cycle.
    pub remaining: usize,
    pub used: usize,
    /// Only ever true in `exhaust` mode; `loop` never runs dry.
    pub exhausted: bool,
    pub capped_players: Vec<PlayerId>,
}

impl DeckStatus {
    pub fn of(state: &DrawState) -> Self {
        let remaining = state.remaining();
        Self {
            mode: state.mode,
            total: state.deck.len(),
            remaining,
            used: state.used_items.len(),
            exhausted: state.mode == DrawMode::Exhaust && remaining == 0,
            capped_players: PlayerId::all().filter(|p| state.is_capped(*p)).collect(),
        }
    }
}

impl fmt::Display for DeckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} / {}", self.mode, self.remaining, self.total)?;
        if self.mode == DrawMode::Loop {
            f.write_str(" (Cycle)")?;
        }
        write!(f, " (Used: {})", self.used)?;
        f.write_str(if self.exhausted { " Empty (Miss)" } else { " Ready" })?;
        for player in &self.capped_players {
            write!(f, " {player}:MAX")?;
        }
        Ok(())
    }
}
