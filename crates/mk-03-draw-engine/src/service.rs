//! # Draw Engine Service
//!
//! Binds the pure `draw` algorithm to an injected random source.

use std::sync::Arc;

use shared_types::DrawState;

use crate::adapters::ThreadRandomSource;
use crate::algorithms::draw;
use crate::domain::{DrawOutcome, DrawRequest};
use crate::ports::RandomSource;

#[derive(Clone)]
pub struct DrawEngine {
    rng: Arc<dyn RandomSource>,
}

impl DrawEngine {
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }

    /// Draw for `request` against `state`. Never mutates `state`.
    pub fn draw(&self, state: &DrawState, request: DrawRequest) -> DrawOutcome {
        draw(state, request, self.rng.as_ref())
    }
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandomSource))
    }
}

impl std::fmt::Debug for DrawEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEngine").finish_non_exhaustive()
    }
}
