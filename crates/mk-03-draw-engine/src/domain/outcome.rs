//! Draw requests and what a draw produced.

use std::fmt;

use shared_types::{DrawMode, DrawState, PlayerId, SpinEvent, Timestamp};

use super::errors::DrawError;

/// One player's request to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub player: PlayerId,
    /// Mode currently selected by the operator; wins over the stored mode.
    pub mode_override: Option<DrawMode>,
    pub timestamp: Timestamp,
}

impl DrawRequest {
    pub fn new(player: PlayerId, timestamp: Timestamp) -> Self {
        Self {
            player,
            mode_override: None,
            timestamp,
        }
    }

    /// Request for a raw player number as typed by an operator.
    pub fn for_player(raw: u8, timestamp: Timestamp) -> Result<Self, DrawError> {
        Ok(Self::new(PlayerId::new(raw)?, timestamp))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DrawMode) -> Self {
        self.mode_override = Some(mode);
        self
    }
}

/// Terminal state of one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Picked,
    Miss,
    /// The used set was exhausted in `loop` mode, cleared, and an item picked.
    ResetPicked,
    /// The used set was cleared but nothing could be picked.
    ResetMiss,
}

impl DrawKind {
    fn from_parts(reset: bool, miss: bool) -> Self {
        match (reset, miss) {
            (false, false) => DrawKind::Picked,
            (false, true) => DrawKind::Miss,
            (true, false) => DrawKind::ResetPicked,
            (true, true) => DrawKind::ResetMiss,
        }
    }

    /// Metric label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DrawKind::Picked => "picked",
            DrawKind::Miss => "miss",
            DrawKind::ResetPicked => "reset_picked",
            DrawKind::ResetMiss => "reset_miss",
        }
    }
}

impl fmt::Display for DrawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed draw: the next state and the fact to publish once it is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawn {
    pub state: DrawState,
    pub event: SpinEvent,
    pub kind: DrawKind,
}

impl Drawn {
    pub(crate) fn new(state: DrawState, event: SpinEvent) -> Self {
        let kind = DrawKind::from_parts(event.reset_occurred, event.is_miss);
        Self { state, event, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// The player reached the cap: no event, no mutation.
    Capped,
    Drawn(Drawn),
}

impl DrawOutcome {
    #[must_use]
    pub fn drawn(self) -> Option<Drawn> {
        match self {
            DrawOutcome::Drawn(drawn) => Some(drawn),
            DrawOutcome::Capped => None,
        }
    }
}

/// Result of the bounded duplicate-safe pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(String),
    /// Every attempt collided with the used set.
    DegradedMiss,
}
