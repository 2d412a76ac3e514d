//! Deadline supervision: one timer task per pending request.

use crate::domain::correlation::CorrelationId;
use crate::domain::outcome::Outcome;
use crate::domain::pending::CorrelationRegistry;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Arms and fires per-request deadline timers.
///
/// Timers never remove entries themselves; they race through
/// [`CorrelationRegistry::resolve`] like every other resolver. A timer
/// attached with `arm_timer` is aborted as soon as its request resolves
/// by another path.
#[derive(Clone)]
pub struct DeadlineSupervisor {
    registry: Arc<CorrelationRegistry>,
}

impl DeadlineSupervisor {
    pub fn new(registry: Arc<CorrelationRegistry>) -> Self {
        Self { registry }
    }

    /// Spawn the timer for `id` and attach it to the registry entry.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, id: CorrelationId, deadline: Instant) {
        let registry = self.registry.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            expire(&registry, id);
        });
        self.registry.arm_timer(id, timer.abort_handle());
    }

    /// Resolve `id` as timed out now. Returns true if the timeout won.
    pub fn expire(&self, id: CorrelationId) -> bool {
        expire(&self.registry, id)
    }
}

fn expire(registry: &CorrelationRegistry, id: CorrelationId) -> bool {
    if registry.resolve(id, Outcome::TimedOut) {
        warn!(correlation_id = %id, "Timeout waiting for observation");
        true
    } else {
        debug!(correlation_id = %id, "Deadline fired for already-resolved request");
        false
    }
}
