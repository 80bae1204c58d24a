//! Message-envelope transport (`POST /submit`).
//!
//! The envelope carries no health or listing operation. Health submits an
//! empty message and counts any non-5xx reply as healthy. Listing reports
//! [`AgentError::Unsupported`] so the caller falls back to its static catalog.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{build_http_client, trim_base_url, AgentClientConfig, AgentService, ProtocolList};
use crate::error::AgentError;

#[derive(Serialize)]
struct Envelope<'a> {
    sender: &'a str,
    destination: &'a str,
    message: Value,
}

/// Extract the reply text from an envelope response.
///
/// Tries, in order: `results`, `information`, the value itself as a string,
/// then `body.results`.
pub fn normalize_reply(value: &Value) -> Option<String> {
    let candidates = [
        value.get("results"),
        value.get("information"),
        Some(value),
        value.get("body").and_then(|body| body.get("results")),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Agent client that wraps every request in a `/submit` envelope.
pub struct EnvelopeAgentClient {
    submit_url: String,
    sender: String,
    destination: String,
    http_client: reqwest::Client,
}

impl EnvelopeAgentClient {
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        Ok(Self {
            submit_url: format!("{}/submit", trim_base_url(&config.base_url)),
            sender: config.sender,
            destination: config.destination,
            http_client: build_http_client(config.timeout)?,
        })
    }

    async fn post_envelope(&self, message: Value) -> Result<reqwest::Response, AgentError> {
        debug!(url = %self.submit_url, "agent envelope submit");
        let envelope = Envelope {
            sender: &self.sender,
            destination: &self.destination,
            message,
        };
        Ok(self
            .http_client
            .post(&self.submit_url)
            .json(&envelope)
            .send()
            .await?)
    }

    async fn submit(&self, message: Value) -> Result<String, AgentError> {
        let response = self.post_envelope(message).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AgentError::NotFound(self.submit_url.clone()));
        }
        if !status.is_success() {
            return Err(AgentError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;
        normalize_reply(&body).ok_or(AgentError::EmptyAnswer)
    }
}

#[async_trait]
impl AgentService for EnvelopeAgentClient {
    async fn health(&self) -> Result<bool, AgentError> {
        // An empty message is rejected by the agent, which still proves it is up.
        let response = self.post_envelope(json!({})).await?;
        Ok(!response.status().is_server_error())
    }

    async fn list_protocols(&self) -> Result<ProtocolList, AgentError> {
        Err(AgentError::Unsupported("protocol listing"))
    }

    async fn protocol_info(&self, name: &str) -> Result<String, AgentError> {
        self.submit(json!({ "protocol_name": name }))
            .await
            .map_err(|e| match e {
                AgentError::NotFound(_) => AgentError::NotFound(name.to_string()),
                other => other,
            })
    }

    async fn chat(&self, question: &str) -> Result<String, AgentError> {
        self.submit(json!({ "question": question })).await
    }
}
