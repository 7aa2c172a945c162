//! # Lottery Events
//!
//! Every message that flows through the replication channel.
//!
//! The wire shape of a message is `{ "type": "...", "payload": ... }` with
//! the payload omitted for signal-only kinds. Events are unordered facts:
//! receivers reconcile them against the store, they never replay them as a
//! log.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use shared_types::{Layout, SpinEvent, Timestamp};
use uuid::Uuid;

/// All messages that can be published to the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotteryEvent {
    /// A draw was committed to the store.
    Spin(SpinEvent),

    /// Used items and counters were cleared; the deck survives.
    ResetGame,

    /// Hint to reload (merge) from the store.
    SyncState,

    /// New display positioning.
    UpdateConfig(Layout),

    /// Hard refresh of every display.
    Reload,
}

impl LotteryEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            LotteryEvent::Spin(_) => EventTopic::Draw,
            LotteryEvent::ResetGame | LotteryEvent::SyncState => EventTopic::Game,
            LotteryEvent::UpdateConfig(_) | LotteryEvent::Reload => EventTopic::Display,
        }
    }

    /// Wire label of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LotteryEvent::Spin(_) => "SPIN",
            LotteryEvent::ResetGame => "RESET_GAME",
            LotteryEvent::SyncState => "SYNC_STATE",
            LotteryEvent::UpdateConfig(_) => "UPDATE_CONFIG",
            LotteryEvent::Reload => "RELOAD",
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Committed draws.
    Draw,
    /// Game lifecycle: resets and store sync hints.
    Game,
    /// Presentation-only signals.
    Display,
}

/// Identity of a publishing context (one browser tab, one process).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    /// Fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Fixed identity, for configuration and tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A published event plus who sent it and when.
///
/// The origin lets a context skip the echo of its own publications. It is
/// metadata only and never changes how the event is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub origin: ContextId,
    pub sent_at: Timestamp,
    pub event: LotteryEvent,
}

impl EventEnvelope {
    /// Wrap an event, stamping it with the wall clock.
    #[must_use]
    pub fn new(origin: ContextId, event: LotteryEvent) -> Self {
        let sent_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            origin,
            sent_at,
            event,
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to receive (empty = all topics).
    pub topics: Vec<EventTopic>,

    /// Drop events published by this context.
    pub exclude_origin: Option<ContextId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            exclude_origin: None,
        }
    }

    /// Also drop the echo of events sent by `origin`.
    #[must_use]
    pub fn excluding_origin(mut self, origin: ContextId) -> Self {
        self.exclude_origin = Some(origin);
        self
    }

    /// Check if an envelope matches this filter.
    #[must_use]
    pub fn matches(&self, envelope: &EventEnvelope) -> bool {
        if self
            .exclude_origin
            .as_ref()
            .is_some_and(|own| *own == envelope.origin)
        {
            return false;
        }
        self.topics.is_empty() || self.topics.contains(&envelope.event.topic())
    }
}
