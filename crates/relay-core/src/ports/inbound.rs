//! Inbound Ports (Driving Ports)
//!
//! Transports either push each received message into an [`InboundSink`]
//! themselves, or expose an [`InboundSource`] that a
//! [`ResponseListener`](crate::adapters::ResponseListener) drains.

use crate::domain::envelope::InboundEnvelope;
use crate::error::TransportError;
use async_trait::async_trait;

/// A message as delivered by a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Still serialized (JSON)
    Raw(Vec<u8>),
    /// Already decoded by the transport
    Envelope(InboundEnvelope),
}

impl From<InboundEnvelope> for InboundMessage {
    fn from(envelope: InboundEnvelope) -> Self {
        Self::Envelope(envelope)
    }
}

impl From<Vec<u8>> for InboundMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

/// Receiver of inbound messages. Implementations must not block.
pub trait InboundSink: Send + Sync {
    /// Route a decoded envelope to the request it answers.
    fn on_inbound_envelope(&self, envelope: InboundEnvelope);

    /// Decode and route a serialized envelope.
    fn on_inbound_message(&self, bytes: &[u8]);

    fn deliver(&self, message: InboundMessage) {
        match message {
            InboundMessage::Raw(bytes) => self.on_inbound_message(&bytes),
            InboundMessage::Envelope(envelope) => self.on_inbound_envelope(envelope),
        }
    }
}

/// Pull-based source of inbound messages.
#[async_trait]
pub trait InboundSource: Send + Sync {
    /// Next message; `Err(TransportError::ChannelClosed)` once exhausted.
    async fn receive(&self) -> Result<InboundMessage, TransportError>;
}
