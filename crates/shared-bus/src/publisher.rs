//! # Event Publisher
//!
//! Defines the publishing side of the replication channel.

use crate::events::{EventEnvelope, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the channel.
///
/// Publishing is fire-and-forget: it never blocks, never waits for an
/// acknowledgment and silently drops the event when nobody is listening.
pub trait EventPublisher: Send + Sync {
    /// Publish an envelope to every current subscriber.
    ///
    /// # Returns
    ///
    /// The number of active subscribers the event was handed to.
    fn publish(&self, envelope: EventEnvelope) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the replication channel.
///
/// Uses `tokio::sync::broadcast`: every publish reaches the subscribers that
/// exist at that moment, late joiners see nothing from before they joined,
/// and a subscriber that falls more than `capacity` events behind loses the
/// oldest ones.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<EventEnvelope>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive events.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(receiver, filter)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InMemoryEventBus {
    fn publish(&self, envelope: EventEnvelope) -> usize {
        let kind = envelope.event.kind();
        let origin = envelope.origin.clone();

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(envelope) {
            Ok(receiver_count) => {
                debug!(
                    kind,
                    origin = %origin,
                    receivers = receiver_count,
                    "Event published"
                );
                receiver_count
            }
            Err(_) => {
                warn!(kind, origin = %origin, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
    fn publish(&self, envelope: EventEnvelope) -> usize {
        (**self).publish(envelope)
    }

    fn events_published(&self) -> u64 {
        (**self).events_published()
    }
}
