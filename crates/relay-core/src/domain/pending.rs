//! Correlation registry - the single source of truth for in-flight requests.
//!
//! Maps correlation IDs to the result slot of the caller waiting on them.
//!
//! Flow:
//! 1. Dispatcher calls `register()` and keeps the returned [`PendingHandle`]
//! 2. Deadline timer is attached with `arm_timer()`
//! 3. Router, timer or shutdown calls `resolve()` / `cancel_all()`
//! 4. The first of them to remove the entry delivers the outcome; every later
//!    attempt sees the entry gone and returns `false`
//!
//! All mutations go through one mutex, so removal from the map is the
//! linearization point for "who resolved this request".

use crate::domain::correlation::CorrelationId;
use crate::domain::outcome::Outcome;
use crate::error::RegistryError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Used when `created_at + timeout` overflows `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// A request waiting for its outcome
struct PendingRequest {
    /// Single-assignment result slot
    slot: oneshot::Sender<Outcome>,
    created_at: Instant,
    deadline: Instant,
    /// Action name (for logging)
    action: String,
    /// Deadline timer, aborted when the request leaves the registry
    timer: Option<AbortHandle>,
}

impl PendingRequest {
    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Point-in-time view of the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryStats {
    /// Requests currently waiting for an outcome
    pub pending: usize,
    pub closed: bool,
    /// Age of the longest-waiting request
    pub oldest_age: Option<Duration>,
    /// Earliest deadline among pending requests
    pub next_deadline: Option<Instant>,
}

#[derive(Default)]
struct RegistryState {
    pending: HashMap<CorrelationId, PendingRequest>,
    closed: bool,
}

/// Caller's side of a registered request.
#[derive(Debug)]
pub struct PendingHandle {
    id: CorrelationId,
    created_at: Instant,
    deadline: Instant,
    receiver: oneshot::Receiver<Outcome>,
}

impl PendingHandle {
    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Wait for the outcome.
    ///
    /// A slot dropped without a value (entry removed or registry gone)
    /// reads as `Cancelled`.
    pub async fn wait(self) -> Outcome {
        self.receiver.await.unwrap_or(Outcome::Cancelled)
    }

    /// Outcome if already delivered, without waiting.
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        self.receiver.try_recv().ok()
    }
}

/// Registry of pending requests keyed by correlation ID.
pub struct CorrelationRegistry {
    state: Mutex<RegistryState>,
    /// Maximum number of simultaneously pending requests
    limit: Option<usize>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl Default for CorrelationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationRegistry {
    /// Create an unbounded registry without metrics
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            limit: None,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Reject registrations beyond `limit` pending requests
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Register a pending request whose deadline is `timeout` from now.
    pub fn register(
        &self,
        id: CorrelationId,
        action: &str,
        timeout: Duration,
    ) -> Result<PendingHandle, RegistryError> {
        let created_at = Instant::now();
        let deadline = created_at
            .checked_add(timeout)
            .unwrap_or_else(|| created_at + FAR_FUTURE);
        let (slot, receiver) = oneshot::channel();

        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(RegistryError::Closed);
            }
            if state.pending.contains_key(&id) {
                return Err(RegistryError::DuplicateId(id));
            }
            if let Some(limit) = self.limit {
                if state.pending.len() >= limit {
                    return Err(RegistryError::Full { limit });
                }
            }
            state.pending.insert(
                id,
                PendingRequest {
                    slot,
                    created_at,
                    deadline,
                    action: action.to_string(),
                    timer: None,
                },
            );
        }

        self.metrics.record_registered();
        debug!(
            correlation_id = %id,
            action = action,
            timeout_ms = timeout.as_millis() as u64,
            "Registered pending request"
        );

        Ok(PendingHandle {
            id,
            created_at,
            deadline,
            receiver,
        })
    }

    /// Attach the deadline timer of `id`.
    ///
    /// If the request already left the registry the timer is aborted right
    /// away and `false` is returned.
    pub fn arm_timer(&self, id: CorrelationId, timer: AbortHandle) -> bool {
        let mut state = self.state.lock();
        match state.pending.get_mut(&id) {
            Some(entry) => {
                if let Some(previous) = entry.timer.replace(timer) {
                    previous.abort();
                }
                true
            }
            None => {
                timer.abort();
                false
            }
        }
    }

    /// Resolve a pending request with `outcome`.
    ///
    /// Returns true iff this call performed the transition out of pending;
    /// false if the id is unknown or was already resolved.
    pub fn resolve(&self, id: CorrelationId, outcome: Outcome) -> bool {
        let entry = self.state.lock().pending.remove(&id);
        let Some(mut entry) = entry else {
            return false;
        };

        entry.disarm();
        let elapsed = entry.created_at.elapsed();
        self.metrics.record_outcome(&outcome, elapsed);
        let label = outcome.label();

        if entry.slot.send(outcome).is_err() {
            debug!(
                correlation_id = %id,
                action = %entry.action,
                "Resolved request whose caller is no longer waiting"
            );
        } else {
            debug!(
                correlation_id = %id,
                action = %entry.action,
                outcome = label,
                elapsed_ms = elapsed.as_millis() as u64,
                "Resolved pending request"
            );
        }
        true
    }

    /// Drop a pending request without delivering an outcome.
    ///
    /// Used when the waiting caller itself went away.
    pub fn remove(&self, id: &CorrelationId) -> bool {
        let entry = self.state.lock().pending.remove(id);
        match entry {
            Some(mut entry) => {
                entry.disarm();
                self.metrics.record_abandoned();
                debug!(
                    correlation_id = %id,
                    action = %entry.action,
                    "Removed abandoned pending request"
                );
                true
            }
            None => false,
        }
    }

    /// Close the registry and cancel everything still pending.
    ///
    /// Snapshot-and-clear happens under a single lock acquisition. Returns
    /// the ids that were cancelled; empty on repeated calls.
    pub fn cancel_all(&self) -> Vec<CorrelationId> {
        let drained: Vec<(CorrelationId, PendingRequest)> = {
            let mut state = self.state.lock();
            state.closed = true;
            state.pending.drain().collect()
        };

        let mut cancelled = Vec::with_capacity(drained.len());
        for (id, mut entry) in drained {
            entry.disarm();
            self.metrics
                .record_outcome(&Outcome::Cancelled, entry.created_at.elapsed());
            let _ = entry.slot.send(Outcome::Cancelled);
            info!(correlation_id = %id, action = %entry.action, "Cancelled pending action");
            cancelled.push(id);
        }
        cancelled
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, id: &CorrelationId) -> bool {
        self.state.lock().pending.contains_key(id)
    }

    /// Number of currently pending requests
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Snapshot of the registry taken under one lock acquisition
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        let now = Instant::now();
        RegistryStats {
            pending: state.pending.len(),
            closed: state.closed,
            oldest_age: state
                .pending
                .values()
                .map(|entry| now.saturating_duration_since(entry.created_at))
                .max(),
            next_deadline: state.pending.values().map(|entry| entry.deadline).min(),
        }
    }

    /// Deadline of a pending request
    pub fn deadline_of(&self, id: &CorrelationId) -> Option<Instant> {
        self.state.lock().pending.get(id).map(|entry| entry.deadline)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
