//! Instructions for the external renderer.

use shared_types::{Layout, PlayerId, Timestamp};

/// One spin as it should be shown, after gatekeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpin {
    pub player: PlayerId,
    /// Position in the player's history row, 0-based.
    pub slot: usize,
    /// `None` renders a miss mark.
    pub result: Option<String>,
    /// The event claimed a win that this display had already shown.
    pub downgraded: bool,
    pub color_index: u8,
    /// Labels to flash while animating.
    pub candidate_set: Vec<String>,
    pub timestamp: Timestamp,
}

impl RenderedSpin {
    #[must_use]
    pub fn is_miss(&self) -> bool {
        self.result.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayAction {
    Render(RenderedSpin),
    /// Wipe every history row.
    Cleared,
    /// Move/scale the display container.
    Relayout(Layout),
    /// Hard refresh; the renderer starts from scratch.
    Reload,
    /// Nothing to show.
    Ignored,
}
