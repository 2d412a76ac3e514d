//! # relay-node
//!
//! Demo node: wires a correlation engine to an in-process executor over the
//! channel transport, runs a handful of actions and prints their outcomes.
//!
//! Configuration comes from the environment (`RELAY_*`, `OTEL_SERVICE_NAME`,
//! `RUST_LOG`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use relay_core::adapters::{channel_transport, inbound_channel, ResponseListener};
use relay_core::{CorrelationEngine, RelayConfig};
use relay_runtime::{Action, ActionKind, ExecutorRuntime, LoopbackExecutor, PrometheusRecorder};
use relay_telemetry::{gather_text, init_telemetry, TelemetryConfig};

const CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("failed to initialize telemetry")?;

    let config = RelayConfig::from_env().context("invalid relay configuration")?;

    let (transport, outbound) = channel_transport(CHANNEL_CAPACITY);
    let (inbound, source) = inbound_channel(CHANNEL_CAPACITY);
    let engine = Arc::new(
        CorrelationEngine::with_metrics(config, Arc::new(transport), Arc::new(PrometheusRecorder))
            .context("failed to build correlation engine")?,
    );

    let listener = ResponseListener::new(Arc::new(source), engine.clone()).spawn();
    let executor = LoopbackExecutor::new()
        .with_latency(Duration::from_millis(20))
        .with_file("/workspace/README.md", "# demo workspace\n")
        .spawn(outbound, inbound);

    let runtime = ExecutorRuntime::new(engine.clone()).with_timeout(Duration::from_secs(2));
    let actions = vec![
        Action::run("echo hello from the relay").with_thought("check the executor is alive"),
        Action::read("/workspace/README.md"),
        Action::write("/workspace/out.txt", "done").with_message("record the result"),
        Action::read("/workspace/out.txt"),
        ActionKind::Mkdir {
            path: "/workspace/tmp".into(),
        }
        .into(),
        ActionKind::AgentFinish.into(),
    ];

    for action in actions {
        let name = action.name();
        let outcome = runtime.execute(action).await;
        println!("{:<8} -> {:?}", name, outcome);
    }

    let stats = engine.stats();
    info!(
        pending = stats.pending,
        oldest_age_ms = stats.oldest_age.map(|age| age.as_millis() as u64),
        "Closing relay"
    );
    let cancelled = runtime.close();
    info!(cancelled = cancelled.len(), "Relay closed");

    // The listener holds the engine, so neither side drains on its own
    listener.abort();
    executor.abort();

    println!("{}", gather_text().context("failed to encode metrics")?);
    Ok(())
}
