//! Typed actions an agent can ask for.

use relay_core::ActionPayload;
use serde::{Deserialize, Serialize};

/// What to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "args", rename_all = "snake_case")]
pub enum ActionKind {
    #[serde(rename = "run")]
    CmdRun { command: String },
    #[serde(rename = "read")]
    FileRead { path: String },
    #[serde(rename = "write")]
    FileWrite { path: String, content: String },
    Mkdir { path: String },
    Rmdir { path: String },
    #[serde(rename = "rm")]
    Remove { path: String },
    #[serde(rename = "run_ipython")]
    IPythonRunCell { code: String },
    #[serde(rename = "browse")]
    BrowseUrl { url: String },
    Recall { query: String },
    #[serde(rename = "finish")]
    AgentFinish,
    Message { content: String },
}

impl ActionKind {
    /// Action name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CmdRun { .. } => "run",
            Self::FileRead { .. } => "read",
            Self::FileWrite { .. } => "write",
            Self::Mkdir { .. } => "mkdir",
            Self::Rmdir { .. } => "rmdir",
            Self::Remove { .. } => "rm",
            Self::IPythonRunCell { .. } => "run_ipython",
            Self::BrowseUrl { .. } => "browse",
            Self::Recall { .. } => "recall",
            Self::AgentFinish => "finish",
            Self::Message { .. } => "message",
        }
    }

    /// Whether the remote executor handles this kind.
    pub fn is_delegated(&self) -> bool {
        !matches!(
            self,
            Self::BrowseUrl { .. } | Self::Recall { .. } | Self::AgentFinish | Self::Message { .. }
        )
    }

    fn args(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::CmdRun { command } => vec![("command", command.as_str())],
            Self::FileRead { path }
            | Self::Mkdir { path }
            | Self::Rmdir { path }
            | Self::Remove { path } => vec![("path", path.as_str())],
            Self::FileWrite { path, content } => {
                vec![("path", path.as_str()), ("content", content.as_str())]
            }
            Self::IPythonRunCell { code } => vec![("code", code.as_str())],
            Self::BrowseUrl { url } => vec![("url", url.as_str())],
            Self::Recall { query } => vec![("query", query.as_str())],
            Self::AgentFinish => vec![],
            Self::Message { content } => vec![("content", content.as_str())],
        }
    }
}

/// An action plus the agent's commentary on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Human-readable note, surfaced in the envelope message
    pub message: Option<String>,
    /// Agent reasoning, forwarded as `args.thought`
    pub thought: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            message: None,
            thought: None,
        }
    }

    pub fn run(command: impl Into<String>) -> Self {
        Self::new(ActionKind::CmdRun {
            command: command.into(),
        })
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self::new(ActionKind::FileRead { path: path.into() })
    }

    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(ActionKind::FileWrite {
            path: path.into(),
            content: content.into(),
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        Self::new(kind)
    }
}

impl From<Action> for ActionPayload {
    fn from(action: Action) -> Self {
        let mut payload = ActionPayload::new(action.kind.name());
        for (key, value) in action.kind.args() {
            payload = payload.with_arg(key, value);
        }
        payload.message = action.message;
        payload.thought = action.thought;
        payload
    }
}
