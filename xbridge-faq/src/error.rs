//! Agent client errors.

use thiserror::Error;

/// Errors returned by an [`crate::AgentService`] implementation.
///
/// The router treats every variant the same way (fall through to the next
/// tier); the distinction exists for logging and tests.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent unreachable: {0}")]
    Network(String),

    #[error("agent returned HTTP {0}")]
    Status(u16),

    #[error("invalid agent response: {0}")]
    InvalidResponse(String),

    #[error("no information for {0}")]
    NotFound(String),

    #[error("{0} is not supported by this transport")]
    Unsupported(&'static str),

    #[error("agent returned an empty answer")]
    EmptyAnswer,
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AgentError::InvalidResponse(err.to_string())
        } else {
            AgentError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::InvalidResponse(err.to_string())
    }
}
