//! Dispatcher: register, submit, wait.

use super::CorrelationEngine;
use crate::domain::correlation::CorrelationId;
use crate::domain::envelope::{ActionPayload, OutboundEnvelope};
use crate::domain::outcome::Outcome;
use crate::domain::pending::CorrelationRegistry;
use crate::error::RegistryError;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Removes the entry if the `send` future is dropped before it resolves.
struct AbandonGuard<'a> {
    registry: &'a CorrelationRegistry,
    id: CorrelationId,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        // No-op once the request has resolved
        self.registry.remove(&self.id);
    }
}

impl CorrelationEngine {
    /// Send an action and wait for its outcome.
    ///
    /// Resolves exactly once with whichever comes first: the matching
    /// observation, the deadline `timeout` from now, or `close()`. A
    /// transport that rejects the envelope yields `Unavailable` right away.
    pub async fn send(&self, payload: ActionPayload, timeout: Duration) -> Outcome {
        self.dispatch(payload, timeout).await.1
    }

    /// [`send`](Self::send) with the configured default timeout.
    pub async fn send_default(&self, payload: ActionPayload) -> Outcome {
        self.send(payload, self.config.default_timeout).await
    }

    /// Like [`send`](Self::send) but also reports the correlation id used.
    pub async fn dispatch(
        &self,
        payload: ActionPayload,
        timeout: Duration,
    ) -> (CorrelationId, Outcome) {
        let id = CorrelationId::new();
        let action = payload.action.clone();

        let handle = match self.registry.register(id, &action, timeout) {
            Ok(handle) => handle,
            Err(e) => return (id, self.refuse(id, &action, e)),
        };
        self.deadlines.arm(id, handle.deadline());
        let _guard = AbandonGuard {
            registry: &self.registry,
            id,
        };

        let envelope = OutboundEnvelope::build(id, payload, &self.config.source);
        debug!(correlation_id = %id, action = %action, "Sending action to executor");

        let submitted =
            tokio::time::timeout(self.config.submit_timeout, self.transport.submit(envelope)).await;
        let failure = match submitted {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!(
                "submit did not complete within {}ms",
                self.config.submit_timeout.as_millis()
            )),
        };

        if let Some(reason) = failure {
            error!(
                correlation_id = %id,
                action = %action,
                error = %reason,
                "Failed to submit action to executor"
            );
            // Loses only if the deadline already fired or close() ran
            self.registry.resolve(id, Outcome::Unavailable(reason));
        }

        let outcome = handle.wait().await;
        debug!(
            correlation_id = %id,
            action = %action,
            outcome = outcome.label(),
            "Received outcome for action"
        );
        (id, outcome)
    }

    /// Outcome for a request the registry would not accept.
    fn refuse(&self, id: CorrelationId, action: &str, err: RegistryError) -> Outcome {
        let outcome = match err {
            RegistryError::Closed => {
                warn!(action = action, "Relay is closed, refusing action");
                Outcome::Cancelled
            }
            RegistryError::Full { .. } | RegistryError::DuplicateId(_) => {
                warn!(correlation_id = %id, action = action, error = %err, "Cannot track action");
                Outcome::Unavailable(err.to_string())
            }
        };
        self.metrics.record_refused(&outcome);
        outcome
    }
}
