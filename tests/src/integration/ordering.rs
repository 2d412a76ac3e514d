//! # Ordering and Races
//!
//! Responses arrive in arbitrary order and may race the deadline timer. Every
//! caller must get exactly one outcome, and it must be its own.

#[cfg(test)]
mod tests {
    use crate::harness::{run_reply, Relay};
    use futures::future::join_all;
    use rand::seq::SliceRandom;
    use relay_core::{ActionPayload, Observation, OutboundEnvelope, Outcome};
    use std::time::Duration;

    fn echo(i: usize) -> ActionPayload {
        ActionPayload::new("run").with_arg("command", format!("echo {}", i))
    }

    fn assert_own_answer(i: usize, outcome: &Outcome) {
        match outcome {
            Outcome::Success(Observation::CmdOutput {
                command, content, ..
            }) => {
                assert_eq!(command, &format!("echo {}", i));
                assert_eq!(content, &format!("answer {}", i));
            }
            other => panic!("request {} got {:?}", i, other),
        }
    }

    /// Answer each envelope with the number from its command.
    async fn answer_all(relay: &Relay, envelopes: &[OutboundEnvelope]) {
        for envelope in envelopes {
            let command = envelope.payload.args["command"].as_str().unwrap();
            let i = command.trim_start_matches("echo ");
            relay
                .reply(run_reply(envelope, &format!("answer {}", i)))
                .await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reverse_order_answers_reach_their_callers() {
        const N: usize = 32;
        let mut relay = Relay::start();

        let callers: Vec<_> = (0..N)
            .map(|i| relay.spawn_send(echo(i), Duration::from_secs(10)))
            .collect();

        let mut envelopes = relay.take_envelopes(N).await;
        envelopes.reverse();
        answer_all(&relay, &envelopes).await;

        for (i, outcome) in join_all(callers).await.into_iter().enumerate() {
            assert_own_answer(i, &outcome.unwrap());
        }
        assert_eq!(relay.engine.pending_count(), 0);
        assert_eq!(relay.metrics.snapshot().succeeded, N as u64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shuffled_answers_reach_their_callers() {
        const N: usize = 64;
        let mut relay = Relay::start();

        let callers: Vec<_> = (0..N)
            .map(|i| relay.spawn_send(echo(i), Duration::from_secs(10)))
            .collect();

        let mut envelopes = relay.take_envelopes(N).await;
        envelopes.shuffle(&mut rand::thread_rng());
        answer_all(&relay, &envelopes).await;

        for (i, outcome) in join_all(callers).await.into_iter().enumerate() {
            assert_own_answer(i, &outcome.unwrap());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_response_racing_deadline_resolves_once() {
        const ROUNDS: usize = 100;
        let mut relay = Relay::start();

        for _ in 0..ROUNDS {
            let caller = relay.spawn_send(echo(0), Duration::from_millis(2));
            let envelope = relay.next_envelope().await;
            tokio::time::sleep(Duration::from_millis(2)).await;
            relay.reply(run_reply(&envelope, "answer 0")).await;

            let outcome = caller.await.unwrap();
            assert!(
                matches!(outcome, Outcome::Success(_) | Outcome::TimedOut),
                "unexpected outcome {:?}",
                outcome
            );
        }

        // Each losing response is discarded as an orphan
        let snapshot = relay
            .wait_for_metrics(|s| s.succeeded + s.orphan_responses == ROUNDS as u64)
            .await;
        assert_eq!(snapshot.succeeded + snapshot.timed_out, ROUNDS as u64);
        assert_eq!(snapshot.orphan_responses, snapshot.timed_out);
        assert_eq!(relay.engine.pending_count(), 0);
    }
}
