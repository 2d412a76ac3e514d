//! Response router: inbound envelopes resolve the request they answer.

use super::CorrelationEngine;
use crate::domain::correlation::CorrelationId;
use crate::domain::envelope::InboundEnvelope;
use crate::domain::outcome::Outcome;
use crate::ports::inbound::InboundSink;
use tracing::{debug, error, warn};

impl InboundSink for CorrelationEngine {
    fn on_inbound_envelope(&self, envelope: InboundEnvelope) {
        let cause = match envelope.cause_id() {
            Ok(cause) => cause,
            Err(_) => {
                self.metrics.record_malformed_message();
                error!(
                    kind = ?envelope.kind,
                    "Received observation without a cause id, discarding"
                );
                return;
            }
        };

        let Ok(id) = CorrelationId::parse(cause) else {
            self.discard_orphan(cause);
            return;
        };

        let outcome = envelope.decode();
        let unknown_kind = match &outcome {
            Outcome::UnknownResponseKind { kind, .. } => Some(kind.clone().unwrap_or_default()),
            _ => None,
        };

        if !self.registry.resolve(id, outcome) {
            self.discard_orphan(cause);
            return;
        }

        match unknown_kind {
            Some(kind) => warn!(
                correlation_id = %id,
                kind = %kind,
                "Received unknown observation kind from executor"
            ),
            None => debug!(correlation_id = %id, "Routed observation to pending request"),
        }
    }

    fn on_inbound_message(&self, bytes: &[u8]) {
        match InboundEnvelope::from_slice(bytes) {
            Ok(envelope) => self.on_inbound_envelope(envelope),
            Err(e) => {
                self.metrics.record_malformed_message();
                error!(error = %e, len = bytes.len(), "Discarding undecodable inbound message");
            }
        }
    }
}

impl CorrelationEngine {
    fn discard_orphan(&self, cause: &str) {
        self.metrics.record_orphan_response();
        warn!(
            cause = cause,
            "Received observation for unknown or already-resolved id"
        );
    }
}
