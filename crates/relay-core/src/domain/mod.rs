//! Domain types for the correlation engine.
//!
//! Identifiers, wire envelopes, observations, outcomes, configuration and the
//! registry of in-flight requests.

pub mod config;
pub mod correlation;
pub mod envelope;
pub mod observation;
pub mod outcome;
pub mod pending;

// Re-exports for convenience
pub use config::{ConfigError, RelayConfig};
pub use correlation::CorrelationId;
pub use envelope::{ActionPayload, InboundEnvelope, OutboundEnvelope};
pub use observation::{Observation, ObservationKind};
pub use outcome::{Outcome, RequestState};
pub use pending::{CorrelationRegistry, PendingHandle, RegistryStats};
