//! # MK-Lottery Runtime
//!
//! Process wiring for one context.
//!
//! ```text
//!  stdin ──→ Command ──→ ControlSurface ──publish──→ InMemoryEventBus
//!                            │     ↑                     │
//!                       lease│     │handle_event         │
//!                  load/save │     └─────────────────────┤
//!                            ↓                           ↓
//!                    FileBackedKVStore            DisplaySurface ──→ stdout
//! ```
//!
//! - `config/` - `RuntimeConfig` from environment variables
//! - `commands/` - operator command parsing
//! - `console/` - one-line renderings of outcomes and display actions

pub mod commands;
pub mod config;
pub mod console;

pub use commands::{Command, CommandError};
pub use config::RuntimeConfig;
