//! # Action Relay Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | registry | register + resolve of one request |
//! | envelope | decoding an inbound observation |
//! | engine | full send round trip over the channel transport |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use relay_core::adapters::{channel_transport, inbound_channel, ResponseListener};
use relay_core::domain::pending::CorrelationRegistry;
use relay_core::{
    ActionPayload, CorrelationEngine, CorrelationId, InboundEnvelope, Outcome, RelayConfig,
};
use relay_runtime::LoopbackExecutor;
use std::sync::Arc;
use std::time::Duration;

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let registry = CorrelationRegistry::new();

    group.bench_function("register_resolve", |b| {
        b.iter(|| {
            let id = CorrelationId::new();
            let mut handle = registry
                .register(id, "run", Duration::from_secs(60))
                .unwrap();
            registry.resolve(id, Outcome::TimedOut);
            black_box(handle.try_outcome())
        })
    });
    group.finish();
}

fn bench_envelope_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    for size in [16usize, 1024, 64 * 1024] {
        let bytes = serde_json::to_vec(&serde_json::json!({
            "cause": CorrelationId::new().to_string(),
            "observation": "read",
            "content": "x".repeat(size),
            "extras": {"path": "/workspace/file.txt"},
        }))
        .unwrap();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| black_box(InboundEnvelope::from_slice(bytes).unwrap().decode()))
        });
    }
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(10));
    let rt = tokio::runtime::Runtime::new().unwrap();

    let engine = rt.block_on(async {
        let (transport, outbound) = channel_transport(1024);
        let (inbound, source) = inbound_channel(1024);
        let engine = Arc::new(
            CorrelationEngine::new(RelayConfig::default(), Arc::new(transport)).unwrap(),
        );
        ResponseListener::new(Arc::new(source), engine.clone()).spawn();
        LoopbackExecutor::new().spawn(outbound, inbound);
        engine
    });

    group.bench_function("send_echo", |b| {
        b.to_async(&rt).iter(|| {
            let engine = engine.clone();
            async move {
                engine
                    .send(
                        ActionPayload::new("run").with_arg("command", "echo bench"),
                        Duration::from_secs(5),
                    )
                    .await
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_registry, bench_envelope_decode, bench_round_trip);
criterion_main!(benches);
