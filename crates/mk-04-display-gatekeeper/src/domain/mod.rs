//! # Domain Module
//!
//! The seen-set gatekeeper and the actions a display hands its renderer.

pub mod actions;
pub mod gatekeeper;

pub use actions::*;
pub use gatekeeper::*;
