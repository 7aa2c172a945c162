//! # Event Subscriber
//!
//! Defines the subscription side of the replication channel.

use crate::events::{EventEnvelope, EventFilter};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Trait for subscribing to events from the channel.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

impl EventSubscriber for crate::publisher::InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        crate::publisher::InMemoryEventBus::subscribe(self, filter)
    }
}

/// A subscription handle for receiving events.
///
/// Dropping it releases its slot on the channel.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<EventEnvelope>,

    /// Filter for this subscription.
    filter: EventFilter,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(receiver: broadcast::Receiver<EventEnvelope>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(envelope)` - The next matching event
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<EventEnvelope> {
        loop {
            let envelope = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&envelope) {
                return Some(envelope);
            }
        }
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(envelope))` - An event was available and matched
    /// - `Ok(None)` - No event available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<EventEnvelope>, SubscriptionError> {
        loop {
            let envelope = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(lagged = count, "Subscriber lagged, some events dropped");
                    continue;
                }
            };

            if self.filter.matches(&envelope) {
                return Ok(Some(envelope));
            }
        }
    }

    /// Drain every event currently buffered for this subscriber.
    pub fn drain(&mut self) -> Result<Vec<EventEnvelope>, SubscriptionError> {
        let mut drained = Vec::new();
        while let Some(envelope) = self.try_recv()? {
            drained.push(envelope);
        }
        Ok(drained)
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(topics = ?self.filter.topics, "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators. Lagged
/// gaps are skipped, matching the best-effort delivery of `recv`.
pub struct EventStream {
    inner: BroadcastStream<EventEnvelope>,
    filter: EventFilter,
    _subscription: Subscription,
}

impl EventStream {
    /// Create a new event stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        let inner = BroadcastStream::new(subscription.receiver.resubscribe());
        Self {
            inner,
            filter: subscription.filter.clone(),
            _subscription: subscription,
        }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = EventEnvelope;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(envelope))) => {
                    if self.filter.matches(&envelope) {
                        return Poll::Ready(Some(envelope));
                    }
                }
                Poll::Ready(Some(Err(lagged))) => {
                    warn!(error = %lagged, "Event stream lagged, some events dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
