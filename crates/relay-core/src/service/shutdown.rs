//! Shutdown: cancel every outstanding request.

use super::CorrelationEngine;
use crate::domain::correlation::CorrelationId;
use tracing::{debug, info};

impl CorrelationEngine {
    /// Close the engine.
    ///
    /// Every still-pending request resolves as `Cancelled` and its timer is
    /// disarmed; later `send` calls return `Cancelled` without submitting.
    /// Calling `close` again is a no-op returning an empty list.
    pub fn close(&self) -> Vec<CorrelationId> {
        if self.registry.is_closed() {
            debug!("Correlation engine already closed");
            return self.registry.cancel_all();
        }

        info!(
            pending = self.registry.pending_count(),
            "Closing correlation engine. Outstanding actions will be cancelled."
        );
        let cancelled = self.registry.cancel_all();
        info!(cancelled = cancelled.len(), "Correlation engine closed");
        cancelled
    }
}
