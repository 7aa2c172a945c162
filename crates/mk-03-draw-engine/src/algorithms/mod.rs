//! # Algorithms
//!
//! - `pick` - bounded duplicate-safe uniform pick
//! - `draw` - one full draw over a `DrawState`

pub mod draw;
pub mod pick;

pub use draw::draw;
pub use pick::pick_unique;
