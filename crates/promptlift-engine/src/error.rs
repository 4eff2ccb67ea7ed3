use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why the remote path produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Credentials or client setup are missing
    #[error("remote optimizer is not configured: {0}")]
    Config(String),

    /// Transport failure or non-success HTTP status
    #[error("{0}")]
    Upstream(String),

    #[error("model returned empty content")]
    EmptyReply,

    #[error("model output is not valid JSON")]
    MalformedJson,

    #[error("model output is missing optimized text")]
    IncompleteResult,
}

impl RemoteError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteError::Config(_) => FailureKind::Config,
            RemoteError::Upstream(_) => FailureKind::Upstream,
            RemoteError::EmptyReply => FailureKind::EmptyReply,
            RemoteError::MalformedJson => FailureKind::MalformedJson,
            RemoteError::IncompleteResult => FailureKind::IncompleteResult,
        }
    }
}

/// Stable label for a degradation cause, safe to expose to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Config,
    Upstream,
    EmptyReply,
    MalformedJson,
    IncompleteResult,
    /// The caller gave up before the remote call finished
    Cancelled,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Config => "config",
            FailureKind::Upstream => "upstream",
            FailureKind::EmptyReply => "empty_reply",
            FailureKind::MalformedJson => "malformed_json",
            FailureKind::IncompleteResult => "incomplete_result",
            FailureKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
