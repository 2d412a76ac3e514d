//! Engine metrics exported through the Prometheus registry.

use relay_core::{MetricsRecorder, Outcome};
use relay_telemetry::metrics::{
    INBOUND_DISCARDED, REQUESTS_PENDING, REQUESTS_REGISTERED, REQUEST_OUTCOMES,
    RESOLUTION_DURATION,
};
use relay_telemetry::metric_inc;
use std::time::Duration;

/// [`MetricsRecorder`] feeding the relay's Prometheus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecorder;

impl MetricsRecorder for PrometheusRecorder {
    fn record_registered(&self) {
        metric_inc!(REQUESTS_REGISTERED);
        REQUESTS_PENDING.inc();
    }

    fn record_outcome(&self, outcome: &Outcome, elapsed: Duration) {
        REQUESTS_PENDING.dec();
        metric_inc!(REQUEST_OUTCOMES, &[outcome.label()]);
        RESOLUTION_DURATION.observe(elapsed.as_secs_f64());
    }

    fn record_refused(&self, outcome: &Outcome) {
        metric_inc!(REQUEST_OUTCOMES, &[outcome.label()]);
    }

    fn record_abandoned(&self) {
        REQUESTS_PENDING.dec();
        metric_inc!(REQUEST_OUTCOMES, &["abandoned"]);
    }

    fn record_orphan_response(&self) {
        metric_inc!(INBOUND_DISCARDED, &["orphan"]);
    }

    fn record_malformed_message(&self) {
        metric_inc!(INBOUND_DISCARDED, &["malformed"]);
    }
}
