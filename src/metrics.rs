//! Metrics collection and export module

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::time::Instant;

/// Global metrics registry
pub struct Metrics {
    registry: Registry,

    // Counters
    pub buy_requests_total: IntCounter,
    pub buy_requests_succeeded: IntCounter,
    pub buy_requests_failed: IntCounterVec,

    // Gauges
    pub buy_requests_in_flight: IntGauge,

    // Histograms
    pub build_latency: Histogram,
    pub anchor_fetch_latency: Histogram,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let buy_requests_total = IntCounter::with_opts(Opts::new(
            "buy_requests_total",
            "Total number of purchase requests received",
        ))?;

        let buy_requests_succeeded = IntCounter::with_opts(Opts::new(
            "buy_requests_succeeded",
            "Number of purchase requests answered with a bundle",
        ))?;

        let buy_requests_failed = IntCounterVec::new(
            Opts::new("buy_requests_failed", "Number of failed purchase requests"),
            &["category"],
        )?;

        let buy_requests_in_flight = IntGauge::with_opts(Opts::new(
            "buy_requests_in_flight",
            "Number of purchase requests currently being assembled",
        ))?;

        let build_latency = Histogram::with_opts(
            HistogramOpts::new("buy_build_latency_seconds", "End-to-end bundle build latency")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0]),
        )?;

        let anchor_fetch_latency = Histogram::with_opts(
            HistogramOpts::new("anchor_fetch_latency_seconds", "Checkpoint anchor fetch latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;

        registry.register(Box::new(buy_requests_total.clone()))?;
        registry.register(Box::new(buy_requests_succeeded.clone()))?;
        registry.register(Box::new(buy_requests_failed.clone()))?;
        registry.register(Box::new(buy_requests_in_flight.clone()))?;
        registry.register(Box::new(build_latency.clone()))?;
        registry.register(Box::new(anchor_fetch_latency.clone()))?;

        Ok(Self {
            registry,
            buy_requests_total,
            buy_requests_succeeded,
            buy_requests_failed,
            buy_requests_in_flight,
            build_latency,
            anchor_fetch_latency,
        })
    }

    /// Record a failed request under its error category
    pub fn record_failure(&self, category: &str) {
        self.buy_requests_failed.with_label_values(&[category]).inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn encode_text(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Global metrics instance
pub fn metrics() -> &'static Metrics {
    static METRICS: once_cell::sync::Lazy<Metrics> =
        once_cell::sync::Lazy::new(|| Metrics::new().expect("Failed to initialize metrics"));
    &METRICS
}

/// Timer helper for measuring operation duration
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn observe_duration(&self, histogram: &Histogram) {
        histogram.observe(self.elapsed_secs());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps `buy_requests_in_flight` accurate on every exit path
pub struct InFlightGauge<'a> {
    gauge: &'a IntGauge,
}

impl<'a> InFlightGauge<'a> {
    pub fn enter(gauge: &'a IntGauge) -> Self {
        gauge.inc();
        Self { gauge }
    }
}

impl Drop for InFlightGauge<'_> {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
