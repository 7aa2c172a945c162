//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use mk_02_lease_lock::LeaseConfig;
use mk_05_control_surface::{ControlConfig, DEFAULT_COOLDOWN, DEFAULT_RELAYOUT_DELAY};
use shared_bus::ContextId;
use shared_types::RemoteResetPolicy;

/// Default location of the shared record file.
pub const DEFAULT_DATA_FILE: &str = "./data/lottery.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// File backing the key/value store shared by every context.
    pub data_file: PathBuf,
    /// Replication log shared by every context. Next to `data_file` when unset.
    pub event_log: Option<PathBuf>,
    /// Fixed context identity; a random one is generated when unset.
    pub context_id: Option<String>,
    pub lease: LeaseConfig,
    pub cooldown: Duration,
    pub relayout_delay: Duration,
    pub remote_reset_policy: RemoteResetPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            event_log: None,
            context_id: None,
            lease: LeaseConfig::default(),
            cooldown: DEFAULT_COOLDOWN,
            relayout_delay: DEFAULT_RELAYOUT_DELAY,
            remote_reset_policy: RemoteResetPolicy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `MK_DATA_FILE` | `./data/lottery.json` |
    /// | `MK_EVENT_LOG` | `MK_DATA_FILE` with an `.events` extension |
    /// | `MK_CONTEXT_ID` | random |
    /// | `MK_LEASE_TTL_MS` | 5000 |
    /// | `MK_LEASE_ATTEMPTS` | 10 |
    /// | `MK_LEASE_BACKOFF_MS` | 100 |
    /// | `MK_LEASE_SETTLE_MS` | 50 |
    /// | `MK_COOLDOWN_MS` | 500 |
    /// | `MK_RELAYOUT_DELAY_MS` | 500 |
    /// | `MK_REMOTE_RESET_POLICY` | `loop-only` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults; a set key
    /// that does not parse is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("MK_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        config.event_log = lookup("MK_EVENT_LOG")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        config.context_id = lookup("MK_CONTEXT_ID").filter(|id| !id.trim().is_empty());

        if let Some(ttl) = parse(&lookup, "MK_LEASE_TTL_MS")? {
            config.lease.ttl_ms = ttl;
        }
        if let Some(attempts) = parse(&lookup, "MK_LEASE_ATTEMPTS")? {
            config.lease.max_attempts = attempts;
        }
        if let Some(ms) = parse(&lookup, "MK_LEASE_BACKOFF_MS")? {
            config.lease.backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "MK_LEASE_SETTLE_MS")? {
            config.lease.settle = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "MK_COOLDOWN_MS")? {
            config.cooldown = Duration::from_millis(ms);
        }
        if let Some(ms) = parse(&lookup, "MK_RELAYOUT_DELAY_MS")? {
            config.relayout_delay = Duration::from_millis(ms);
        }
        if let Some(policy) = parse(&lookup, "MK_REMOTE_RESET_POLICY")? {
            config.remote_reset_policy = policy;
        }

        Ok(config)
    }

    /// Where this context appends and tails replication events.
    #[must_use]
    pub fn event_log_path(&self) -> PathBuf {
        self.event_log
            .clone()
            .unwrap_or_else(|| self.data_file.with_extension("events"))
    }

    /// Control surface settings derived from this configuration.
    #[must_use]
    pub fn control_config(&self) -> ControlConfig {
        ControlConfig {
            context_id: self
                .context_id
                .clone()
                .map(ContextId::named)
                .unwrap_or_else(ContextId::generate),
            cooldown: self.cooldown,
            relayout_delay: self.relayout_delay,
            remote_reset_policy: self.remote_reset_policy,
            lease: self.lease.clone(),
        }
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("invalid value for {key}"))
}
