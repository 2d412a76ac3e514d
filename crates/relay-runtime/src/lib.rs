//! # Relay Runtime
//!
//! Agent-facing runtime on top of `relay-core`.
//!
//! - `actions`: typed action vocabulary converted to wire payloads
//! - `runtime`: [`ExecutorRuntime`], delegating actions to the executor
//! - `metrics`: [`PrometheusRecorder`] bridging engine metrics to Prometheus
//! - `loopback`: [`LoopbackExecutor`], an in-process executor for demos and tests

pub mod actions;
pub mod loopback;
pub mod metrics;
pub mod runtime;

pub use actions::{Action, ActionKind};
pub use loopback::LoopbackExecutor;
pub use metrics::PrometheusRecorder;
pub use runtime::ExecutorRuntime;
