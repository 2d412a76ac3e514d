//! Observations returned by the remote executor.
//!
//! Only the kinds listed in [`ObservationKind`] are recognized. Anything else
//! is surfaced to the caller as `Outcome::UnknownResponseKind`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Exit code reported when the executor omits one.
pub const UNKNOWN_EXIT_CODE: i64 = -1;

/// Kind tags the router knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationKind {
    /// Output of a shell command (`"run"`).
    Run,
    /// Contents of a file that was read (`"read"`).
    Read,
    /// Acknowledgement of a file write (`"write"`).
    Write,
}

impl ObservationKind {
    /// Map a wire tag to a known kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "run" => Some(Self::Run),
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            _ => None,
        }
    }

    /// Wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed observation delivered to a caller on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "observation")]
pub enum Observation {
    /// Result of running a command.
    #[serde(rename = "run")]
    CmdOutput {
        command: String,
        exit_code: i64,
        content: String,
    },
    /// Result of reading a file.
    #[serde(rename = "read")]
    FileRead { path: String, content: String },
    /// Result of writing a file.
    #[serde(rename = "write")]
    FileWrite { path: String, content: String },
    /// Produced locally for actions the executor does not handle.
    #[serde(rename = "null")]
    Null { content: String },
}

impl Observation {
    /// Decode an inbound payload given its kind tag.
    ///
    /// Missing extras fall back to empty strings and [`UNKNOWN_EXIT_CODE`].
    /// Returns `None` when the kind is absent or not recognized.
    pub fn decode(kind: Option<&str>, content: &str, extras: &Map<String, Value>) -> Option<Self> {
        let kind = ObservationKind::from_tag(kind?)?;
        let content = content.to_string();
        let observation = match kind {
            ObservationKind::Run => Self::CmdOutput {
                command: extra_str(extras, "command"),
                exit_code: extras
                    .get("exit_code")
                    .and_then(Value::as_i64)
                    .unwrap_or(UNKNOWN_EXIT_CODE),
                content,
            },
            ObservationKind::Read => Self::FileRead {
                path: extra_str(extras, "path"),
                content,
            },
            ObservationKind::Write => Self::FileWrite {
                path: extra_str(extras, "path"),
                content,
            },
        };
        Some(observation)
    }

    /// Local placeholder observation.
    pub fn null(content: impl Into<String>) -> Self {
        Self::Null {
            content: content.into(),
        }
    }

    /// Kind of this observation, `None` for locally produced ones.
    pub fn kind(&self) -> Option<ObservationKind> {
        match self {
            Self::CmdOutput { .. } => Some(ObservationKind::Run),
            Self::FileRead { .. } => Some(ObservationKind::Read),
            Self::FileWrite { .. } => Some(ObservationKind::Write),
            Self::Null { .. } => None,
        }
    }

    /// Text content of the observation.
    pub fn content(&self) -> &str {
        match self {
            Self::CmdOutput { content, .. }
            | Self::FileRead { content, .. }
            | Self::FileWrite { content, .. }
            | Self::Null { content } => content,
        }
    }
}

fn extra_str(extras: &Map<String, Value>, key: &str) -> String {
    extras
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
