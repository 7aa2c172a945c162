//! # Gatekeeper
//!
//! A display-local set of item labels already rendered as wins, independent
//! of the store's used set. It only ever turns a result into a miss; it
//! never writes back.

use std::collections::HashSet;

use shared_types::{RemoteResetPolicy, SpinEvent};
use tracing::warn;

/// What the gatekeeper made of one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    /// First sighting of the result; render it as a win.
    Fresh(String),
    /// The result was already rendered; render a miss instead.
    Downgraded(String),
    /// The spin itself was a miss.
    Miss,
}

impl GateVerdict {
    /// The item to render, if any.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        match self {
            GateVerdict::Fresh(item) => Some(item),
            GateVerdict::Downgraded(_) | GateVerdict::Miss => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    seen: HashSet<String>,
    policy: RemoteResetPolicy,
}

impl Gatekeeper {
    pub fn new(policy: RemoteResetPolicy) -> Self {
        Self {
            seen: HashSet::new(),
            policy,
        }
    }

    /// Run one spin through the gate.
    ///
    /// A reset flag clears the seen-set first when the policy accepts it for
    /// the spin's mode.
    pub fn admit(&mut self, spin: &SpinEvent) -> GateVerdict {
        if spin.reset_occurred && self.policy.honors(spin.mode) {
            self.seen.clear();
        }

        let Some(item) = spin.result_value.as_ref().filter(|_| !spin.is_miss) else {
            return GateVerdict::Miss;
        };

        if self.seen.contains(item) {
            warn!(
                item = %item,
                player_id = %spin.player_id,
                mode = %spin.mode,
                "[mk-04] Prevented duplicate display"
            );
            return GateVerdict::Downgraded(item.clone());
        }

        self.seen.insert(item.clone());
        GateVerdict::Fresh(item.clone())
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    #[must_use]
    pub fn has_seen(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn policy(&self) -> RemoteResetPolicy {
        self.policy
    }
}
