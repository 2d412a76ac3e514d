//! Outbound Ports (Driven Ports)
//!
//! The transport is an external collaborator: framing, reconnection and
//! authentication all live behind this trait.

use crate::domain::envelope::OutboundEnvelope;
use crate::error::TransportError;
use async_trait::async_trait;

/// Channel to the remote executor.
///
/// `submit` must report failure promptly instead of blocking until the peer
/// comes back; the engine additionally bounds every call with
/// `RelayConfig::submit_timeout`.
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// Hand one envelope to the transport.
    async fn submit(&self, envelope: OutboundEnvelope) -> Result<(), TransportError>;
}
