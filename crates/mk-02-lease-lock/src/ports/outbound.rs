//! # Outbound Ports
//!
//! The lease needs wall-clock time to judge expiry. Expiry is decided by
//! comparison at read time, never by an active timer.

use shared_types::Timestamp;

/// Abstract interface for time.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> Timestamp;
}
