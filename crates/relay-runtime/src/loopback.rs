//! In-process executor answering actions over the channel transport.
//!
//! Keeps an in-memory file table so `write` followed by `read` behaves like
//! a real workspace. Commands are not executed: `echo` prints its
//! arguments, anything else reports exit code 127.

use parking_lot::Mutex;
use relay_core::{InboundMessage, OutboundEnvelope};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Simulated executor.
#[derive(Clone, Default)]
pub struct LoopbackExecutor {
    files: Arc<Mutex<HashMap<String, String>>>,
    latency: Duration,
}

impl LoopbackExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.lock().insert(path.into(), content.into());
        self
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    /// Observation answering `envelope`, as wire JSON.
    pub fn respond(&self, envelope: &OutboundEnvelope) -> Value {
        let cause = envelope.id.to_string();
        let args = &envelope.payload.args;
        let arg = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or_default();

        match envelope.action() {
            "run" => {
                let command = arg("command");
                let (exit_code, content) = match command.strip_prefix("echo") {
                    Some(rest) if rest.is_empty() || rest.starts_with(' ') => {
                        (0, format!("{}\n", rest.trim_start()))
                    }
                    _ => (127, format!("{}: command not found", command)),
                };
                json!({
                    "cause": cause,
                    "observation": "run",
                    "content": content,
                    "extras": {"command": command, "exit_code": exit_code},
                })
            }
            "read" => {
                let path = arg("path");
                match self.files.lock().get(path) {
                    Some(content) => json!({
                        "cause": cause,
                        "observation": "read",
                        "content": content,
                        "extras": {"path": path},
                    }),
                    None => json!({
                        "cause": cause,
                        "observation": "error",
                        "content": format!("File not found: {}", path),
                    }),
                }
            }
            "write" => {
                let path = arg("path");
                self.files
                    .lock()
                    .insert(path.to_string(), arg("content").to_string());
                json!({
                    "cause": cause,
                    "observation": "write",
                    "content": "",
                    "extras": {"path": path},
                })
            }
            other => json!({
                "cause": cause,
                "observation": "error",
                "content": format!("Unsupported action: {}", other),
            }),
        }
    }

    /// Answer envelopes from `outbound` on `inbound` until either side closes.
    pub async fn serve(
        self,
        mut outbound: mpsc::Receiver<OutboundEnvelope>,
        inbound: mpsc::Sender<InboundMessage>,
    ) {
        while let Some(envelope) = outbound.recv().await {
            let reply = match serde_json::to_vec(&self.respond(&envelope)) {
                Ok(bytes) => InboundMessage::Raw(bytes),
                Err(e) => {
                    warn!(correlation_id = %envelope.id, error = %e, "Failed to encode reply");
                    continue;
                }
            };
            debug!(correlation_id = %envelope.id, action = envelope.action(), "Executor replying");

            if self.latency.is_zero() {
                if inbound.send(reply).await.is_err() {
                    break;
                }
            } else {
                let inbound = inbound.clone();
                let latency = self.latency;
                tokio::spawn(async move {
                    tokio::time::sleep(latency).await;
                    let _ = inbound.send(reply).await;
                });
            }
        }
        debug!("Loopback executor stopped");
    }

    pub fn spawn(
        self,
        outbound: mpsc::Receiver<OutboundEnvelope>,
        inbound: mpsc::Sender<InboundMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.serve(outbound, inbound))
    }
}
