//! Prometheus metrics for the monitoring engine.
//!
//! [`MonitorMetrics`] owns a dedicated [`Registry`] that the HTTP
//! `/status/metrics` endpoint encodes into the Prometheus text exposition
//! format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

/// Central collection of engine-level Prometheus metrics.
pub struct MonitorMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Total sweeps completed.
    pub sweeps_total: IntCounter,
    /// Total monitoring passes dispatched.
    pub passes_total: IntCounter,
    /// Passes that persisted a confirmed-success state.
    pub passes_confirmed: IntCounter,
    /// Passes that persisted a confirmed-failure state.
    pub passes_failed: IntCounter,
    /// Passes that persisted an abandonment.
    pub passes_abandoned: IntCounter,
    /// Passes that persisted a chain I/O error.
    pub passes_errored: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Candidate-set size observed at the start of the last sweep.
    pub candidates: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall-clock duration of a full sweep, in milliseconds.
    pub sweep_duration_ms: Histogram,
}

impl MonitorMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let sweeps_total = register_int_counter_with_registry!(
            Opts::new("chainwatch_sweeps_total", "Total sweeps completed"),
            registry
        )
        .expect("failed to register sweeps_total counter");

        let passes_total = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_passes_total",
                "Total monitoring passes dispatched"
            ),
            registry
        )
        .expect("failed to register passes_total counter");

        let passes_confirmed = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_passes_confirmed_total",
                "Passes that confirmed a successful transaction"
            ),
            registry
        )
        .expect("failed to register passes_confirmed counter");

        let passes_failed = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_passes_failed_total",
                "Passes that confirmed a reverted transaction"
            ),
            registry
        )
        .expect("failed to register passes_failed counter");

        let passes_abandoned = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_passes_abandoned_total",
                "Passes that abandoned a transaction over its checks budget"
            ),
            registry
        )
        .expect("failed to register passes_abandoned counter");

        let passes_errored = register_int_counter_with_registry!(
            Opts::new(
                "chainwatch_passes_errored_total",
                "Passes that recorded a chain I/O error"
            ),
            registry
        )
        .expect("failed to register passes_errored counter");

        let candidates = register_int_gauge_with_registry!(
            Opts::new(
                "chainwatch_candidates",
                "Candidate-set size at the start of the last sweep"
            ),
            registry
        )
        .expect("failed to register candidates gauge");

        // Exponential buckets covering 1 ms → ~16 s.
        let sweep_duration_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "chainwatch_sweep_duration_ms",
                "Full sweep duration in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(1.0, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register sweep_duration_ms histogram");

        Self {
            registry,
            sweeps_total,
            passes_total,
            passes_confirmed,
            passes_failed,
            passes_abandoned,
            passes_errored,
            candidates,
            sweep_duration_ms,
        }
    }
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
