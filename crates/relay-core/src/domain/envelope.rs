//! Envelopes exchanged with the transport.
//!
//! ## Wire shapes (JSON)
//!
//! Outbound: `{"id", "action", "args", "message", "source"}`
//!
//! Inbound: `{"cause", "observation", "content", "extras"}` where `cause`
//! echoes the outbound `id` and `observation` is the kind tag.

use crate::domain::correlation::CorrelationId;
use crate::domain::observation::Observation;
use crate::domain::outcome::Outcome;
use crate::error::EnvelopeError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// What the caller asks the executor to do.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionPayload {
    /// Action name understood by the executor (`run`, `read`, ...)
    pub action: String,
    /// Action arguments
    pub args: Map<String, Value>,
    /// Optional human-readable description
    pub message: Option<String>,
    /// Optional reasoning attached to the action
    pub thought: Option<String>,
}

impl ActionPayload {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }
}

/// Action part of an outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePayload {
    pub action: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Descriptive fields of an outbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub message: String,
    pub source: String,
}

/// Envelope handed to the transport for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEnvelope {
    pub id: CorrelationId,
    #[serde(flatten)]
    pub payload: EnvelopePayload,
    #[serde(flatten)]
    pub metadata: EnvelopeMetadata,
}

impl OutboundEnvelope {
    /// Build the envelope for `payload`.
    ///
    /// A non-empty thought is folded into `args.thought`.
    pub fn build(id: CorrelationId, payload: ActionPayload, source: &str) -> Self {
        let ActionPayload {
            action,
            mut args,
            message,
            thought,
        } = payload;

        let message = match message.filter(|m| !m.is_empty()) {
            Some(m) => format!("Action delegate: {}", m),
            None => format!("Delegating {} to executor", action),
        };

        if let Some(thought) = thought.filter(|t| !t.is_empty()) {
            args.insert("thought".to_string(), Value::String(thought));
        }

        Self {
            id,
            payload: EnvelopePayload { action, args },
            metadata: EnvelopeMetadata {
                message,
                source: source.to_string(),
            },
        }
    }

    pub fn action(&self) -> &str {
        &self.payload.action
    }

    pub fn to_json(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Envelope received from the transport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InboundEnvelope {
    /// Correlation id of the request this answers
    #[serde(
        default,
        deserialize_with = "cause_from_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub cause: Option<String>,
    /// Observation kind tag
    #[serde(default, rename = "observation", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub content: String,
    #[serde(default)]
    pub extras: Map<String, Value>,
}

impl InboundEnvelope {
    pub fn new(
        cause: impl Into<String>,
        kind: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            cause: Some(cause.into()),
            kind: Some(kind.into()),
            content: content.into(),
            extras: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The cause id, rejecting absent or blank values.
    pub fn cause_id(&self) -> Result<&str, EnvelopeError> {
        match self.cause.as_deref().map(str::trim) {
            Some(cause) if !cause.is_empty() => Ok(cause),
            _ => Err(EnvelopeError::MissingCause),
        }
    }

    /// Decode the payload into the outcome delivered to the caller.
    pub fn decode(&self) -> Outcome {
        match Observation::decode(self.kind.as_deref(), &self.content, &self.extras) {
            Some(obs) => Outcome::Success(obs),
            None => Outcome::UnknownResponseKind {
                kind: self.kind.clone(),
                content: self.content.clone(),
            },
        }
    }
}

fn cause_from_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "cause must be a string or number, got {}",
            other
        ))),
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
