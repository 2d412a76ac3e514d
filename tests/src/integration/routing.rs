//! # Response Routing
//!
//! Inbound messages that do not cleanly answer a pending request.

#[cfg(test)]
mod tests {
    use crate::harness::{run_reply, Relay};
    use relay_core::{ActionPayload, CorrelationId, InboundEnvelope, Observation, Outcome};
    use std::time::Duration;

    #[tokio::test]
    async fn test_unrecognized_kind_is_reported() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(ActionPayload::new("browse"), Duration::from_secs(5));
        let envelope = relay.next_envelope().await;
        relay
            .reply(InboundEnvelope::new(
                envelope.id.to_string(),
                "screenshot",
                "<png>",
            ))
            .await;

        assert_eq!(
            caller.await.unwrap(),
            Outcome::UnknownResponseKind {
                kind: Some("screenshot".into()),
                content: "<png>".into(),
            }
        );
        assert_eq!(relay.metrics.snapshot().unknown_kind, 1);
    }

    #[tokio::test]
    async fn test_unknown_cause_leaves_others_pending() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(
            ActionPayload::new("read").with_arg("path", "/etc/hosts"),
            Duration::from_secs(5),
        );
        let envelope = relay.next_envelope().await;

        relay
            .reply(InboundEnvelope::new(
                CorrelationId::new().to_string(),
                "read",
                "stray",
            ))
            .await;
        relay.wait_for_metrics(|s| s.orphan_responses == 1).await;
        assert_eq!(relay.engine.pending_count(), 1);

        relay
            .reply(
                InboundEnvelope::new(envelope.id.to_string(), "read", "127.0.0.1 localhost")
                    .with_extra("path", "/etc/hosts"),
            )
            .await;
        assert_eq!(
            caller.await.unwrap(),
            Outcome::Success(Observation::FileRead {
                path: "/etc/hosts".into(),
                content: "127.0.0.1 localhost".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_messages_are_skipped() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(
            ActionPayload::new("run").with_arg("command", "true"),
            Duration::from_secs(5),
        );
        let envelope = relay.next_envelope().await;

        relay.reply_raw(&b"{not json"[..]).await;
        relay
            .reply_raw(&br#"{"observation": "run", "content": "no cause"}"#[..])
            .await;
        relay
            .reply_raw(&br#"{"cause": ["array"], "observation": "run"}"#[..])
            .await;
        relay.wait_for_metrics(|s| s.malformed_messages == 3).await;

        relay.reply(run_reply(&envelope, "")).await;
        assert!(caller.await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_raw_reply_with_null_content() {
        let mut relay = Relay::start();

        let caller = relay.spawn_send(
            ActionPayload::new("run").with_arg("command", "false"),
            Duration::from_secs(5),
        );
        let envelope = relay.next_envelope().await;
        let reply = serde_json::json!({
            "cause": envelope.id.to_string(),
            "observation": "run",
            "content": null,
            "extras": {"command": "false", "exit_code": 1},
        });
        relay.reply_raw(serde_json::to_vec(&reply).unwrap()).await;

        assert_eq!(
            caller.await.unwrap(),
            Outcome::Success(Observation::CmdOutput {
                command: "false".into(),
                exit_code: 1,
                content: String::new(),
            })
        );
    }
}
