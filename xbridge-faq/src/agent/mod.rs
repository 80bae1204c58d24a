//! Remote agent contract and its transports.
//!
//! The router only sees [`AgentService`]. Two adapters speak to a deployed
//! agent:
//!
//! ```text
//! ┌──────────────┐      ┌─────────────────────┐   GET  /health
//! │              │ ───► │ RestAgentClient     │   GET  /protocols/list
//! │  FaqRouter   │      └─────────────────────┘   POST /protocol/info, /chat/question
//! │              │      ┌─────────────────────┐
//! │              │ ───► │ EnvelopeAgentClient │   POST /submit {sender, destination, message}
//! └──────────────┘      └─────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AgentError;

mod envelope;
mod rest;

#[cfg(test)]
pub(crate) mod mock;

pub use envelope::{normalize_reply, EnvelopeAgentClient};
pub use rest::RestAgentClient;

/// Version of the agent contract implemented by this crate.
pub const AGENT_CONTRACT_VERSION: u32 = 1;

/// Default agent base URL.
pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Protocol short name to display name.
pub type ProtocolList = BTreeMap<String, String>;

/// Operations offered by the remote FAQ agent.
#[async_trait]
pub trait AgentService: Send + Sync {
    fn contract_version(&self) -> u32 {
        AGENT_CONTRACT_VERSION
    }

    /// Whether the agent reports itself healthy.
    async fn health(&self) -> Result<bool, AgentError>;

    /// Protocols the agent knows about.
    async fn list_protocols(&self) -> Result<ProtocolList, AgentError>;

    /// Free-text information about one protocol.
    async fn protocol_info(&self, name: &str) -> Result<String, AgentError>;

    /// Answer to a free-text question.
    async fn chat(&self, question: &str) -> Result<String, AgentError>;
}

#[async_trait]
impl<T: AgentService + ?Sized> AgentService for Arc<T> {
    fn contract_version(&self) -> u32 {
        (**self).contract_version()
    }

    async fn health(&self) -> Result<bool, AgentError> {
        (**self).health().await
    }

    async fn list_protocols(&self) -> Result<ProtocolList, AgentError> {
        (**self).list_protocols().await
    }

    async fn protocol_info(&self, name: &str) -> Result<String, AgentError> {
        (**self).protocol_info(name).await
    }

    async fn chat(&self, question: &str) -> Result<String, AgentError> {
        (**self).chat(question).await
    }
}

/// Wire format used to reach the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AgentTransport {
    /// Plain REST endpoints.
    #[default]
    Rest,
    /// Message envelope posted to `/submit`.
    Envelope,
}

impl FromStr for AgentTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(AgentTransport::Rest),
            "envelope" | "submit" => Ok(AgentTransport::Envelope),
            other => Err(format!("unknown agent transport {:?}", other)),
        }
    }
}

impl fmt::Display for AgentTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentTransport::Rest => f.write_str("rest"),
            AgentTransport::Envelope => f.write_str("envelope"),
        }
    }
}

/// Connection settings shared by both transports.
#[derive(Clone, Debug)]
pub struct AgentClientConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub transport: AgentTransport,
    /// Envelope `sender` field.
    pub sender: String,
    /// Envelope `destination` field.
    pub destination: String,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AGENT_URL.to_string(),
            timeout: DEFAULT_AGENT_TIMEOUT,
            transport: AgentTransport::Rest,
            sender: "xbridge-faq".to_string(),
            destination: "protocol-info-agent".to_string(),
        }
    }
}

/// Build the client for `config.transport`.
pub fn connect(config: AgentClientConfig) -> Result<Arc<dyn AgentService>, AgentError> {
    let client: Arc<dyn AgentService> = match config.transport {
        AgentTransport::Rest => Arc::new(RestAgentClient::new(config)?),
        AgentTransport::Envelope => Arc::new(EnvelopeAgentClient::new(config)?),
    };
    Ok(client)
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AgentError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AgentError::Network(e.to_string()))
}

pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
