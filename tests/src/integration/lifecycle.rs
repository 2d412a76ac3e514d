//! # Request Lifecycle
//!
//! Timeouts, late responses, shutdown and transport refusal.

#[cfg(test)]
mod tests {
    use crate::harness::{run_reply, Relay};
    use relay_core::adapters::channel_transport;
    use relay_core::{ActionPayload, CorrelationEngine, Outcome, RelayConfig};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(ActionPayload::new("run"), Duration::from_millis(50));
        let envelope = relay.next_envelope().await;
        assert_eq!(caller.await.unwrap(), Outcome::TimedOut);

        relay.reply(run_reply(&envelope, "too late")).await;
        let snapshot = relay.wait_for_metrics(|s| s.orphan_responses == 1).await;

        assert_eq!(snapshot.timed_out, 1);
        assert_eq!(snapshot.succeeded, 0);
        assert_eq!(relay.engine.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_close_cancels_three_pending() {
        let mut relay = Relay::start();

        let callers: Vec<_> = ["run", "read", "write"]
            .into_iter()
            .map(|action| relay.spawn_send(ActionPayload::new(action), Duration::from_secs(60)))
            .collect();
        relay.take_envelopes(3).await;

        assert_eq!(relay.engine.close().len(), 3);
        assert_eq!(relay.engine.pending_count(), 0);
        for caller in callers {
            assert_eq!(caller.await.unwrap(), Outcome::Cancelled);
        }

        assert!(relay.engine.close().is_empty());
        assert_eq!(relay.metrics.snapshot().cancelled, 3);
    }

    #[tokio::test]
    async fn test_response_after_close_is_discarded() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(ActionPayload::new("run"), Duration::from_secs(60));
        let envelope = relay.next_envelope().await;
        relay.engine.close();
        assert_eq!(caller.await.unwrap(), Outcome::Cancelled);

        relay.reply(run_reply(&envelope, "ignored")).await;
        relay.wait_for_metrics(|s| s.orphan_responses == 1).await;
    }

    #[tokio::test]
    async fn test_disconnected_transport_is_unavailable_immediately() {
        let (transport, outbound) = channel_transport(8);
        drop(outbound);
        let engine = CorrelationEngine::new(RelayConfig::default(), Arc::new(transport)).unwrap();

        let started = Instant::now();
        let outcome = engine
            .send(ActionPayload::new("run"), Duration::from_secs(600))
            .await;

        assert!(matches!(outcome, Outcome::Unavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(engine.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_full_queue_is_unavailable() {
        let relay = Relay::with_config(RelayConfig::default(), 1);

        // Nothing drains the outbound queue, so the second submit overflows
        let first = relay.spawn_send(ActionPayload::new("run"), Duration::from_secs(60));
        relay.wait_for_metrics(|s| s.registered == 1).await;

        let second = relay
            .engine
            .send(ActionPayload::new("run"), Duration::from_secs(60))
            .await;
        assert!(matches!(second, Outcome::Unavailable(ref reason) if reason.contains("full")));

        relay.engine.close();
        assert_eq!(first.await.unwrap(), Outcome::Cancelled);
    }

    #[tokio::test]
    async fn test_max_pending_is_enforced() {
        let mut relay = Relay::with_config(RelayConfig::default().with_max_pending(2), 8);

        let callers: Vec<_> = (0..2)
            .map(|_| relay.spawn_send(ActionPayload::new("run"), Duration::from_secs(60)))
            .collect();
        let envelopes = relay.take_envelopes(2).await;

        let refused = relay
            .engine
            .send(ActionPayload::new("run"), Duration::from_secs(60))
            .await;
        assert!(matches!(refused, Outcome::Unavailable(_)));

        for envelope in &envelopes {
            relay.reply(run_reply(envelope, "ok")).await;
        }
        for caller in callers {
            assert!(caller.await.unwrap().is_success());
        }
    }
}
