//! Test harness: a correlation engine over channel transports, with the
//! test playing the executor.

use relay_core::adapters::{channel_transport, inbound_channel, ResponseListener};
use relay_core::{
    ActionPayload, CorrelationEngine, InboundEnvelope, InboundMessage, Metrics, MetricsSnapshot,
    OutboundEnvelope, Outcome, RelayConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long helpers wait before declaring a test hung.
pub const PATIENCE: Duration = Duration::from_secs(5);

pub struct Relay {
    pub engine: Arc<CorrelationEngine>,
    pub metrics: Arc<Metrics>,
    outbound: mpsc::Receiver<OutboundEnvelope>,
    inbound: mpsc::Sender<InboundMessage>,
    listener: JoinHandle<()>,
}

impl Relay {
    pub fn start() -> Self {
        Self::with_config(RelayConfig::default(), 256)
    }

    pub fn with_config(config: RelayConfig, capacity: usize) -> Self {
        let (transport, outbound) = channel_transport(capacity);
        let (inbound, source) = inbound_channel(capacity);
        let metrics = Arc::new(Metrics::new());
        let engine = Arc::new(
            CorrelationEngine::with_metrics(config, Arc::new(transport), metrics.clone())
                .expect("valid relay config"),
        );
        let listener = ResponseListener::new(Arc::new(source), engine.clone()).spawn();

        Self {
            engine,
            metrics,
            outbound,
            inbound,
            listener,
        }
    }

    /// Start `send` on a background task.
    pub fn spawn_send(
        &self,
        payload: ActionPayload,
        timeout: Duration,
    ) -> JoinHandle<Outcome> {
        let engine = self.engine.clone();
        tokio::spawn(async move { engine.send(payload, timeout).await })
    }

    /// Next envelope the engine submitted.
    pub async fn next_envelope(&mut self) -> OutboundEnvelope {
        tokio::time::timeout(PATIENCE, self.outbound.recv())
            .await
            .expect("engine submitted nothing")
            .expect("outbound channel closed")
    }

    pub async fn take_envelopes(&mut self, n: usize) -> Vec<OutboundEnvelope> {
        let mut envelopes = Vec::with_capacity(n);
        for _ in 0..n {
            envelopes.push(self.next_envelope().await);
        }
        envelopes
    }

    pub async fn reply(&self, envelope: InboundEnvelope) {
        self.inbound
            .send(envelope.into())
            .await
            .expect("listener stopped");
    }

    pub async fn reply_raw(&self, bytes: impl Into<Vec<u8>>) {
        self.inbound
            .send(InboundMessage::Raw(bytes.into()))
            .await
            .expect("listener stopped");
    }

    /// Wait until the metrics satisfy `done`.
    pub async fn wait_for_metrics(
        &self,
        done: impl Fn(&MetricsSnapshot) -> bool,
    ) -> MetricsSnapshot {
        let wait = async {
            loop {
                let snapshot = self.metrics.snapshot();
                if done(&snapshot) {
                    return snapshot;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        };
        tokio::time::timeout(PATIENCE, wait)
            .await
            .expect("metrics never reached the expected state")
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// A `run` observation answering `envelope`.
pub fn run_reply(envelope: &OutboundEnvelope, content: &str) -> InboundEnvelope {
    let command = envelope
        .payload
        .args
        .get("command")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    InboundEnvelope::new(envelope.id.to_string(), "run", content)
        .with_extra("command", command)
        .with_extra("exit_code", 0)
}
