//! Prometheus metrics for the action relay.
//!
//! All metrics follow the naming convention: `relay_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: requests registered, outcomes by kind, discarded inbound
//! - **Gauge**: requests currently pending
//! - **Histogram**: registration-to-resolution latency

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Requests accepted into the registry
    pub static ref REQUESTS_REGISTERED: Counter = Counter::new(
        "relay_requests_registered_total",
        "Total actions registered for correlation"
    ).expect("metric creation failed");

    /// Finished requests by outcome
    pub static ref REQUEST_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("relay_request_outcomes_total", "Finished actions by outcome"),
        &["outcome"]  // success/timed_out/cancelled/unavailable/unknown_kind/abandoned
    ).expect("metric creation failed");

    /// Requests currently waiting for an observation
    pub static ref REQUESTS_PENDING: Gauge = Gauge::new(
        "relay_requests_pending",
        "Actions currently waiting for an observation"
    ).expect("metric creation failed");

    /// Time from registration to resolution
    pub static ref RESOLUTION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "relay_request_resolution_seconds",
            "Time from registering an action to its outcome"
        ).buckets(exponential_buckets(0.001, 2.0, 18).expect("valid bucket layout"))
    ).expect("metric creation failed");

    /// Inbound messages that resolved nothing
    pub static ref INBOUND_DISCARDED: CounterVec = CounterVec::new(
        Opts::new("relay_inbound_discarded_total", "Inbound messages discarded"),
        &["reason"]  // orphan/malformed
    ).expect("metric creation failed");
}

/// Register all relay metrics with [`REGISTRY`].
///
/// Calling this more than once is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REQUESTS_REGISTERED.clone()),
        Box::new(REQUEST_OUTCOMES.clone()),
        Box::new(REQUESTS_PENDING.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
        Box::new(INBOUND_DISCARDED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
