//! # Relay Core
//!
//! Request/response correlation over an asynchronous, unordered transport.
//!
//! A caller hands an action to [`CorrelationEngine::send`] and waits. The
//! action goes out tagged with a fresh [`CorrelationId`]; the remote executor
//! answers with an observation whose `cause` echoes that id, possibly much
//! later and in any order relative to other answers.
//!
//! ## Architecture
//!
//! ```text
//!   send(payload, timeout)                     inbound messages
//!          │                                          │
//!   ┌──────┴──────┐   submit   ┌───────────┐   ┌──────┴───────┐
//!   │ Dispatcher  │───────────▶│ Transport │   │    Router    │
//!   └──────┬──────┘            └───────────┘   └──────┬───────┘
//!          │ register                          resolve│
//!   ┌──────┴──────────────────────────────────────────┴───────┐
//!   │                  Correlation Registry                    │
//!   │          id -> (oneshot slot, deadline, timer)           │
//!   └──────┬──────────────────────────────────────────┬───────┘
//!          │ expire                           cancel_all│
//!   ┌──────┴──────┐                            ┌───────┴──────┐
//!   │  Deadlines  │                            │   close()    │
//!   └─────────────┘                            └──────────────┘
//! ```
//!
//! Every request resolves exactly once: with the matching observation, with
//! `TimedOut` when its deadline passes, with `Unavailable` if the transport
//! refuses it, or with `Cancelled` on shutdown.
//!
//! ## Usage
//!
//! ```ignore
//! use relay_core::adapters::{channel_transport, inbound_channel, ResponseListener};
//! use relay_core::{ActionPayload, CorrelationEngine, RelayConfig};
//!
//! let (transport, outbound) = channel_transport(64);
//! let (inbound, source) = inbound_channel(64);
//! let engine = Arc::new(CorrelationEngine::new(RelayConfig::default(), Arc::new(transport))?);
//! ResponseListener::new(Arc::new(source), engine.clone()).spawn();
//!
//! let outcome = engine
//!     .send(ActionPayload::new("run").with_arg("command", "ls"), Duration::from_secs(30))
//!     .await;
//! ```

#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{
    ActionPayload, ConfigError, CorrelationId, InboundEnvelope, Observation, ObservationKind,
    OutboundEnvelope, Outcome, RegistryStats, RelayConfig, RequestState,
};
pub use error::{EnvelopeError, RegistryError, RelayError, TransportError};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{InboundMessage, InboundSink, InboundSource, TransportPort};
pub use service::CorrelationEngine;
