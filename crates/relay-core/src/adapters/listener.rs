//! Response listener: pumps an inbound source into a sink.

use crate::error::TransportError;
use crate::ports::inbound::{InboundSink, InboundSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Pause after a failed receive before polling the source again.
pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Drains an [`InboundSource`] until it closes.
pub struct ResponseListener {
    source: Arc<dyn InboundSource>,
    sink: Arc<dyn InboundSink>,
    error_backoff: Duration,
}

impl ResponseListener {
    pub fn new(source: Arc<dyn InboundSource>, sink: Arc<dyn InboundSink>) -> Self {
        Self {
            source,
            sink,
            error_backoff: DEFAULT_ERROR_BACKOFF,
        }
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Run the listener loop
    pub async fn run(self) {
        info!("Response listener started");
        loop {
            match self.source.receive().await {
                Ok(message) => self.sink.deliver(message),
                Err(TransportError::ChannelClosed) => {
                    warn!("Inbound channel closed, stopping listener");
                    break;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        backoff_ms = self.error_backoff.as_millis() as u64,
                        "Error receiving inbound message"
                    );
                    tokio::time::sleep(self.error_backoff).await;
                }
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
