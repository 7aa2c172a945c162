//! Lease tuning and holder identity.

use std::fmt;
use std::time::Duration;

use shared_types::LEASE_TTL_MS;
use uuid::Uuid;

/// Default number of acquisition attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default wait after finding the lease busy or losing a claim.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

/// Default wait between writing a claim and verifying it.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

/// Lease timing.
///
/// `ttl_ms` must exceed the longest legitimate critical section, and
/// `settle` must exceed the store's write propagation delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseConfig {
    pub ttl_ms: u64,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub settle: Duration,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            ttl_ms: LEASE_TTL_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Fencing token of one acquisition. Fresh for every `acquire`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaseId(String);

impl LeaseId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LeaseId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
