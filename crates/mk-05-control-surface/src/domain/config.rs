use std::time::Duration;

use mk_02_lease_lock::LeaseConfig;
use shared_bus::ContextId;
use shared_types::RemoteResetPolicy;

/// Default minimum gap between two draw requests for the same player.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Default wait between `RELOAD` and the follow-up `UPDATE_CONFIG`.
pub const DEFAULT_RELAYOUT_DELAY: Duration = Duration::from_millis(500);

/// Control surface configuration.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Identity stamped on every published envelope.
    pub context_id: ContextId,
    pub cooldown: Duration,
    pub relayout_delay: Duration,
    pub remote_reset_policy: RemoteResetPolicy,
    pub lease: LeaseConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            context_id: ContextId::generate(),
            cooldown: DEFAULT_COOLDOWN,
            relayout_delay: DEFAULT_RELAYOUT_DELAY,
            remote_reset_policy: RemoteResetPolicy::default(),
            lease: LeaseConfig::default(),
        }
    }
}
