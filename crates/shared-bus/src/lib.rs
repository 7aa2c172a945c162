//! # Shared Bus - Replication Channel
//!
//! Best-effort publish/subscribe between the control surface and every
//! display surface on the same device.
//!
//! ## Delivery Rules
//!
//! - A publish reaches every subscriber that exists at that moment; late
//!   joiners see nothing from before they joined.
//! - No ordering between distinct publishers. Receivers reconcile events as
//!   unordered facts against the store.
//! - Publishing never blocks and has no acknowledgment.
//! - A slow subscriber loses the oldest buffered events, never the newest.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Control    │                    │   Display    │
//! │   surface    │    publish()       │   surface    │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! `InMemoryEventBus` reaches subscribers in one process. `FileEventLog`
//! extends it to every process on the device that opens the same log file.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod file_log;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ContextId, EventEnvelope, EventFilter, EventTopic, LotteryEvent};
pub use file_log::{EventLogError, FileEventLog};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
