//! Executor runtime: the agent-facing side of the relay.
//!
//! File and command actions are delegated to the remote executor through the
//! correlation engine. Browsing, recall, finishing and plain messages have
//! no executor counterpart and are answered locally with a null observation.

use crate::actions::{Action, ActionKind};
use relay_core::{CorrelationEngine, CorrelationId, Observation, Outcome};
use relay_telemetry::log_event;
use std::sync::Arc;
use std::time::Duration;

const COMPONENT: &str = "runtime";

/// Runs agent actions against a remote executor.
pub struct ExecutorRuntime {
    engine: Arc<CorrelationEngine>,
    timeout: Duration,
}

impl ExecutorRuntime {
    /// Runtime using the engine's default timeout for every action.
    pub fn new(engine: Arc<CorrelationEngine>) -> Self {
        let timeout = engine.config().default_timeout;
        Self { engine, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine(&self) -> &Arc<CorrelationEngine> {
        &self.engine
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Route `action` to the handler for its kind.
    pub async fn execute(&self, action: Action) -> Outcome {
        log_event!(
            debug,
            COMPONENT,
            "Executing action",
            action = action.name(),
            delegated = action.kind.is_delegated()
        );
        match action.kind {
            ActionKind::CmdRun { .. } => self.run(action).await,
            ActionKind::FileRead { .. } => self.read(action).await,
            ActionKind::FileWrite { .. } => self.write(action).await,
            ActionKind::Mkdir { .. } => self.mkdir(action).await,
            ActionKind::Rmdir { .. } => self.rmdir(action).await,
            ActionKind::Remove { .. } => self.rm(action).await,
            ActionKind::IPythonRunCell { .. } => self.run_ipython(action).await,
            ActionKind::BrowseUrl { .. } => self.browse(action).await,
            ActionKind::Recall { .. } => self.recall(action).await,
            ActionKind::AgentFinish => self.finish(action).await,
            ActionKind::Message { .. } => self.send_message(action).await,
        }
    }

    pub async fn run(&self, action: Action) -> Outcome {
        self.delegate(action).await
    }

    pub async fn read(&self, action: Action) -> Outcome {
        self.delegate(action).await
    }

    pub async fn write(&self, action: Action) -> Outcome {
        self.delegate(action).await
    }

    pub async fn mkdir(&self, action: Action) -> Outcome {
        self.delegate_generic(action).await
    }

    pub async fn rmdir(&self, action: Action) -> Outcome {
        self.delegate_generic(action).await
    }

    pub async fn rm(&self, action: Action) -> Outcome {
        self.delegate_generic(action).await
    }

    pub async fn run_ipython(&self, action: Action) -> Outcome {
        self.delegate_generic(action).await
    }

    pub async fn browse(&self, action: Action) -> Outcome {
        if let ActionKind::BrowseUrl { url } = &action.kind {
            log_event!(info, COMPONENT, "Browse action answered locally", url = %url);
        }
        local("Browse actions are not executed by the remote executor.")
    }

    pub async fn recall(&self, _action: Action) -> Outcome {
        local("Recall actions are not handled by the executor runtime.")
    }

    pub async fn finish(&self, _action: Action) -> Outcome {
        local("Finish actions are not handled by the executor runtime.")
    }

    pub async fn send_message(&self, _action: Action) -> Outcome {
        local("Messages are not executed by the executor runtime.")
    }

    /// Cancel everything in flight and refuse further actions.
    pub fn close(&self) -> Vec<CorrelationId> {
        self.engine.close()
    }

    async fn delegate_generic(&self, action: Action) -> Outcome {
        log_event!(
            warn,
            COMPONENT,
            "Action has no dedicated executor handler, using generic send",
            action = action.name()
        );
        self.delegate(action).await
    }

    async fn delegate(&self, action: Action) -> Outcome {
        let name = action.name();
        log_event!(info, COMPONENT, "Sending action to executor", action = name);

        let (id, outcome) = self.engine.dispatch(action.into(), self.timeout).await;
        match &outcome {
            Outcome::Success(_) => {
                log_event!(
                    info,
                    COMPONENT,
                    "Received observation",
                    correlation_id = %id,
                    action = name
                );
            }
            Outcome::TimedOut => {
                log_event!(
                    error,
                    COMPONENT,
                    "Timeout waiting for observation",
                    correlation_id = %id,
                    action = name,
                    timeout_ms = self.timeout.as_millis() as u64
                );
            }
            other => {
                log_event!(
                    warn,
                    COMPONENT,
                    "Action did not produce an observation",
                    correlation_id = %id,
                    action = name,
                    outcome = other.label()
                );
            }
        }
        outcome
    }
}

fn local(content: &str) -> Outcome {
    Outcome::Success(Observation::null(content))
}
