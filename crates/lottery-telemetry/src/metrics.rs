//! Prometheus metrics for the lottery subsystems.
//!
//! All metrics follow the naming convention: `mk_<metric>_<unit>`.
//! Counters can be incremented before `register_metrics` runs; registration
//! only makes them visible to `encode_metrics`.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DRAW ENGINE (Subsystem 3)
    // =========================================================================

    /// Draw outcomes
    pub static ref DRAWS: IntCounterVec = IntCounterVec::new(
        Opts::new("mk_draws_total", "Draw requests by outcome"),
        &["outcome"]  // picked/miss/reset_picked/reset_miss/capped
    ).expect("metric creation failed");

    // =========================================================================
    // LEASE LOCK (Subsystem 2)
    // =========================================================================

    /// Lease acquisitions that exhausted their attempts
    pub static ref LEASE_TIMEOUTS: IntCounter = IntCounter::new(
        "mk_lease_timeouts_total",
        "Lease acquisitions that timed out"
    ).expect("metric creation failed");

    /// Time spent acquiring the lease
    pub static ref LEASE_WAIT: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "mk_lease_wait_seconds",
            "Time spent acquiring the lease"
        ).buckets(exponential_buckets(0.01, 2.0, 10).expect("bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // STATE STORE (Subsystem 1)
    // =========================================================================

    /// Loads that found an unparsable record
    pub static ref STORE_CORRUPTIONS: IntCounter = IntCounter::new(
        "mk_store_corruptions_total",
        "Persisted state records that failed to parse"
    ).expect("metric creation failed");

    // =========================================================================
    // DISPLAY GATEKEEPER (Subsystem 4)
    // =========================================================================

    /// Spins forced to a miss at display time
    pub static ref GATEKEEPER_DOWNGRADES: IntCounter = IntCounter::new(
        "mk_gatekeeper_downgrades_total",
        "Spin results downgraded to a miss by a display gatekeeper"
    ).expect("metric creation failed");

    // =========================================================================
    // REPLICATION CHANNEL
    // =========================================================================

    /// Events published by kind
    pub static ref EVENTS_PUBLISHED: IntCounterVec = IntCounterVec::new(
        Opts::new("mk_events_published_total", "Events published by kind"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Handle proving the metrics were registered.
#[derive(Debug)]
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of collectors in the registry.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DRAWS.clone()),
        Box::new(LEASE_TIMEOUTS.clone()),
        Box::new(LEASE_WAIT.clone()),
        Box::new(STORE_CORRUPTIONS.clone()),
        Box::new(GATEKEEPER_DOWNGRADES.clone()),
        Box::new(EVENTS_PUBLISHED.clone()),
    ];
    let registered = metrics.len();

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
