//! Correlation engine.
//!
//! The engine is split by the role each part plays in a request's life:
//!
//! - `dispatcher`: `send` registers, submits and waits
//! - `router`: inbound envelopes resolve the request they answer
//! - `deadline`: per-request timers resolve with `TimedOut`
//! - `shutdown`: `close` cancels everything still pending
//!
//! All four resolve through the same [`CorrelationRegistry`], so whichever
//! acts first decides the outcome and the rest are no-ops.

mod deadline;
mod dispatcher;
mod router;
mod shutdown;

pub use deadline::DeadlineSupervisor;

use crate::domain::config::{ConfigError, RelayConfig};
use crate::domain::pending::{CorrelationRegistry, RegistryStats};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::outbound::TransportPort;
use std::sync::Arc;
use tracing::info;

/// Correlates outbound actions with inbound observations.
pub struct CorrelationEngine {
    registry: Arc<CorrelationRegistry>,
    deadlines: DeadlineSupervisor,
    transport: Arc<dyn TransportPort>,
    config: RelayConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl CorrelationEngine {
    /// Create an engine over `transport` without metrics.
    pub fn new(
        config: RelayConfig,
        transport: Arc<dyn TransportPort>,
    ) -> Result<Self, ConfigError> {
        Self::with_metrics(config, transport, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(
        config: RelayConfig,
        transport: Arc<dyn TransportPort>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = Arc::new(
            CorrelationRegistry::new()
                .with_limit(config.max_pending)
                .with_metrics(metrics.clone()),
        );
        let deadlines = DeadlineSupervisor::new(registry.clone());

        info!(
            default_timeout_ms = config.default_timeout.as_millis() as u64,
            max_pending = config.max_pending,
            source = %config.source,
            "Correlation engine initialized"
        );

        Ok(Self {
            registry,
            deadlines,
            transport,
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CorrelationRegistry> {
        &self.registry
    }

    /// Number of in-flight requests
    pub fn pending_count(&self) -> usize {
        self.registry.pending_count()
    }

    pub fn is_closed(&self) -> bool {
        self.registry.is_closed()
    }

    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }
}

impl Drop for CorrelationEngine {
    fn drop(&mut self) {
        // Disarms timers still holding the registry
        self.registry.cancel_all();
    }
}
