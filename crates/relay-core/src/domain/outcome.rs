//! Terminal outcomes delivered to callers.

use crate::domain::correlation::CorrelationId;
use crate::domain::observation::Observation;
use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a tracked request.
///
/// An entry present in the registry is always `Pending`. The other three
/// states are terminal and are reported through [`Outcome::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    Pending,
    Resolved,
    TimedOut,
    Cancelled,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The single result a caller of `send` observes for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The executor answered with a recognized observation.
    Success(Observation),
    /// No matching response arrived before the deadline.
    TimedOut,
    /// The engine was closed while the request was outstanding.
    Cancelled,
    /// The request could not be handed to the transport.
    Unavailable(String),
    /// A matching response arrived but its kind tag was not recognized.
    UnknownResponseKind {
        kind: Option<String>,
        content: String,
    },
}

impl Outcome {
    /// Terminal state this outcome moves a request into.
    pub fn state(&self) -> RequestState {
        match self {
            Self::TimedOut => RequestState::TimedOut,
            Self::Cancelled => RequestState::Cancelled,
            Self::Success(_) | Self::Unavailable(_) | Self::UnknownResponseKind { .. } => {
                RequestState::Resolved
            }
        }
    }

    /// Short label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
            Self::Unavailable(_) => "unavailable",
            Self::UnknownResponseKind { .. } => "unknown_kind",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the observation if this is a success.
    pub fn observation(&self) -> Option<&Observation> {
        match self {
            Self::Success(obs) => Some(obs),
            _ => None,
        }
    }

    /// Convert into a `Result`, attributing failures to `id`.
    pub fn into_result(self, id: CorrelationId) -> Result<Observation, RelayError> {
        match self {
            Self::Success(obs) => Ok(obs),
            Self::TimedOut => Err(RelayError::TimedOut { id }),
            Self::Cancelled => Err(RelayError::Cancelled { id }),
            Self::Unavailable(reason) => Err(RelayError::Unavailable(reason)),
            Self::UnknownResponseKind { kind, .. } => Err(RelayError::UnknownResponseKind {
                id,
                kind: kind.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states() {
        assert_eq!(Outcome::TimedOut.state(), RequestState::TimedOut);
        assert_eq!(Outcome::Cancelled.state(), RequestState::Cancelled);
        assert_eq!(
            Outcome::Success(Observation::null("")).state(),
            RequestState::Resolved
        );
        assert_eq!(
            Outcome::Unavailable("down".into()).state(),
            RequestState::Resolved
        );
    }

    #[test]
    fn test_timeout_and_cancel_are_distinct_errors() {
        let id = CorrelationId::new();
        assert!(matches!(
            Outcome::TimedOut.into_result(id),
            Err(RelayError::TimedOut { .. })
        ));
        assert!(matches!(
            Outcome::Cancelled.into_result(id),
            Err(RelayError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_into_result() {
        let id = CorrelationId::new();
        let outcome = Outcome::UnknownResponseKind {
            kind: Some("mystery".into()),
            content: "?".into(),
        };
        match outcome.into_result(id) {
            Err(RelayError::UnknownResponseKind { kind, .. }) => assert_eq!(kind, "mystery"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_success_into_result() {
        let obs = Observation::null("ok");
        let out = Outcome::Success(obs.clone());
        assert!(out.is_success());
        assert_eq!(out.observation(), Some(&obs));
        assert_eq!(out.into_result(CorrelationId::new()).unwrap(), obs);
    }
}
