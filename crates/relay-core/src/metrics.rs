//! Metrics hooks for request correlation
//!
//! Counts how requests leave the registry and how inbound traffic that could
//! not be attributed to a request was discarded.
//!
//! ## Usage
//!
//! ```ignore
//! use relay_core::metrics::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let engine = CorrelationEngine::with_metrics(config, transport, metrics.clone())?;
//! // ...
//! println!("timed out so far: {}", metrics.snapshot().timed_out);
//! ```

use crate::domain::outcome::Outcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for the correlation engine
///
/// Thread-safe counters, cheap enough to update on every resolution.
#[derive(Default)]
pub struct Metrics {
    /// Requests registered
    pub registered: AtomicU64,
    /// Requests resolved with a recognized observation
    pub succeeded: AtomicU64,
    /// Requests resolved with an unrecognized observation kind
    pub unknown_kind: AtomicU64,
    /// Requests resolved as unavailable
    pub unavailable: AtomicU64,
    /// Requests resolved by their deadline timer
    pub timed_out: AtomicU64,
    /// Requests cancelled by shutdown
    pub cancelled: AtomicU64,
    /// Requests dropped because their caller went away
    pub abandoned: AtomicU64,
    /// Responses for unknown or already-resolved ids
    pub orphan_responses: AtomicU64,
    /// Inbound messages without a usable correlation id
    pub malformed_messages: AtomicU64,
    /// Cumulative time from registration to resolution, in nanoseconds
    pub resolution_time_ns: AtomicU64,
    /// Number of resolutions contributing to `resolution_time_ns`
    pub resolutions: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            registered: self.registered.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            unknown_kind: self.unknown_kind.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            orphan_responses: self.orphan_responses.load(Ordering::Relaxed),
            malformed_messages: self.malformed_messages.load(Ordering::Relaxed),
            avg_resolution_ns: self.avg_resolution_time_ns(),
        }
    }

    /// Average registration-to-resolution time in nanoseconds
    pub fn avg_resolution_time_ns(&self) -> u64 {
        let total = self.resolution_time_ns.load(Ordering::Relaxed);
        let count = self.resolutions.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    fn bucket(&self, outcome: &Outcome) -> &AtomicU64 {
        match outcome {
            Outcome::Success(_) => &self.succeeded,
            Outcome::UnknownResponseKind { .. } => &self.unknown_kind,
            Outcome::Unavailable(_) => &self.unavailable,
            Outcome::TimedOut => &self.timed_out,
            Outcome::Cancelled => &self.cancelled,
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub registered: u64,
    pub succeeded: u64,
    pub unknown_kind: u64,
    pub unavailable: u64,
    pub timed_out: u64,
    pub cancelled: u64,
    pub abandoned: u64,
    pub orphan_responses: u64,
    pub malformed_messages: u64,
    pub avg_resolution_ns: u64,
}

/// Trait for metrics recording implementations
///
/// Implement this to export engine metrics to an external system.
pub trait MetricsRecorder: Send + Sync {
    /// A request entered the registry
    fn record_registered(&self);

    /// A request left the registry with `outcome` after `elapsed`
    fn record_outcome(&self, outcome: &Outcome, elapsed: Duration);

    /// A request was answered without entering the registry
    fn record_refused(&self, outcome: &Outcome);

    /// A request was removed without an outcome
    fn record_abandoned(&self);

    /// A response could not be matched to a pending request
    fn record_orphan_response(&self);

    /// An inbound message had no usable correlation id
    fn record_malformed_message(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_registered(&self) {}
    fn record_outcome(&self, _: &Outcome, _: Duration) {}
    fn record_refused(&self, _: &Outcome) {}
    fn record_abandoned(&self) {}
    fn record_orphan_response(&self) {}
    fn record_malformed_message(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_registered(&self) {
        self.registered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_outcome(&self, outcome: &Outcome, elapsed: Duration) {
        self.bucket(outcome).fetch_add(1, Ordering::Relaxed);
        self.resolution_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_refused(&self, outcome: &Outcome) {
        self.bucket(outcome).fetch_add(1, Ordering::Relaxed);
    }

    fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    fn record_orphan_response(&self) {
        self.orphan_responses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_malformed_message(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }
}
