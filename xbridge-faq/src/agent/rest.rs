//! REST transport.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, trim_base_url, AgentClientConfig, AgentService, ProtocolList};
use crate::error::AgentError;

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ProtocolsListResponse {
    protocols: ProtocolList,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProtocolInfoRequest<'a> {
    protocol_name: &'a str,
}

#[derive(Deserialize)]
struct ProtocolInfoResponse {
    information: String,
}

#[derive(Serialize)]
struct ChatQuestionRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct ChatQuestionResponse {
    answer: String,
}

/// Agent client for the plain REST endpoints.
pub struct RestAgentClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl RestAgentClient {
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        Ok(Self {
            base_url: trim_base_url(&config.base_url),
            http_client: build_http_client(config.timeout)?,
        })
    }

    /// Create a client for a specific URL with default settings.
    pub fn with_url(base_url: impl Into<String>) -> Result<Self, AgentError> {
        Self::new(AgentClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AgentError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "agent GET");
        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, R: Serialize>(
        &self,
        path: &str,
        body: &R,
    ) -> Result<T, AgentError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "agent POST");
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AgentError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AgentError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            return Err(AgentError::Status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AgentService for RestAgentClient {
    async fn health(&self) -> Result<bool, AgentError> {
        let health: HealthResponse = self.get("/health").await?;
        Ok(health.status == "healthy")
    }

    async fn list_protocols(&self) -> Result<ProtocolList, AgentError> {
        let list: ProtocolsListResponse = self.get("/protocols/list").await?;
        Ok(list.protocols)
    }

    async fn protocol_info(&self, name: &str) -> Result<String, AgentError> {
        let request = ProtocolInfoRequest {
            protocol_name: name,
        };
        let info: ProtocolInfoResponse = self
            .post("/protocol/info", &request)
            .await
            .map_err(|e| match e {
                AgentError::NotFound(_) => AgentError::NotFound(name.to_string()),
                other => other,
            })?;
        Ok(info.information)
    }

    async fn chat(&self, question: &str) -> Result<String, AgentError> {
        let reply: ChatQuestionResponse = self
            .post("/chat/question", &ChatQuestionRequest { question })
            .await?;
        if reply.answer.trim().is_empty() {
            return Err(AgentError::EmptyAnswer);
        }
        Ok(reply.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_info_request_uses_camel_case() {
        let body = serde_json::to_value(ProtocolInfoRequest {
            protocol_name: "solana",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "protocolName": "solana" }));
    }

    #[test]
    fn protocol_list_ignores_extra_fields() {
        let list: ProtocolsListResponse = serde_json::from_value(serde_json::json!({
            "timestamp": 1,
            "count": 1,
            "protocols": { "ibc": "Inter-Blockchain Communication" }
        }))
        .unwrap();
        assert_eq!(list.protocols["ibc"], "Inter-Blockchain Communication");
    }
}
