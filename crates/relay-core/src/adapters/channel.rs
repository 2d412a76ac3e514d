//! In-process transport over bounded tokio channels.
//!
//! The outbound side never waits: a full queue is reported as
//! [`TransportError::QueueFull`] so the request resolves as unavailable
//! instead of stalling the caller.

use crate::domain::envelope::OutboundEnvelope;
use crate::error::TransportError;
use crate::ports::inbound::{InboundMessage, InboundSource};
use crate::ports::outbound::TransportPort;
use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

/// Outbound transport pushing envelopes into an mpsc channel.
#[derive(Clone)]
pub struct ChannelTransport(mpsc::Sender<OutboundEnvelope>);

impl ChannelTransport {
    pub fn new(sender: mpsc::Sender<OutboundEnvelope>) -> Self {
        Self(sender)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

#[async_trait]
impl TransportPort for ChannelTransport {
    async fn submit(&self, envelope: OutboundEnvelope) -> Result<(), TransportError> {
        self.0.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull,
            TrySendError::Closed(_) => TransportError::ChannelClosed,
        })
    }
}

/// Inbound source reading from an mpsc channel.
pub struct ChannelSource(Mutex<mpsc::Receiver<InboundMessage>>);

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<InboundMessage>) -> Self {
        Self(Mutex::new(receiver))
    }
}

#[async_trait]
impl InboundSource for ChannelSource {
    async fn receive(&self) -> Result<InboundMessage, TransportError> {
        let mut guard = self.0.lock().await;
        guard.recv().await.ok_or(TransportError::ChannelClosed)
    }
}

/// Outbound transport plus the receiving end the executor reads from.
pub fn channel_transport(capacity: usize) -> (ChannelTransport, mpsc::Receiver<OutboundEnvelope>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelTransport::new(tx), rx)
}

/// Sender the executor answers on plus the source the engine listens to.
pub fn inbound_channel(capacity: usize) -> (mpsc::Sender<InboundMessage>, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, ChannelSource::new(rx))
}
