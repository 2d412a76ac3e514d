//! Error types for the correlation engine

use crate::domain::correlation::CorrelationId;
use thiserror::Error;

/// Caller-facing errors produced from non-success outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("request {id} timed out waiting for the executor")]
    TimedOut { id: CorrelationId },

    #[error("request {id} was cancelled because the relay shut down")]
    Cancelled { id: CorrelationId },

    #[error("executor unavailable: {0}")]
    Unavailable(String),

    #[error("request {id} received unknown observation kind '{kind}'")]
    UnknownResponseKind { id: CorrelationId, kind: String },
}

/// Errors reported by a transport when submitting an envelope.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("channel closed")]
    ChannelClosed,

    #[error("outbound queue full")]
    QueueFull,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Errors from registering a pending request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry is closed")]
    Closed,

    #[error("correlation id {0} is already pending")]
    DuplicateId(CorrelationId),

    #[error("too many pending requests (limit {limit})")]
    Full { limit: usize },
}

/// Errors decoding a serialized inbound envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("envelope has no cause id")]
    MissingCause,
}
