//! In-memory agent used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AgentService, ProtocolList};
use crate::error::AgentError;

/// Scripted agent that records every call.
#[derive(Default)]
pub(crate) struct MockAgent {
    pub healthy: bool,
    pub chat_reply: Option<String>,
    pub protocols: Option<ProtocolList>,
    pub info: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockAgent {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn with_protocol(mut self, name: &str, display: &str, info: &str) -> Self {
        self.protocols
            .get_or_insert_with(ProtocolList::new)
            .insert(name.to_string(), display.to_string());
        self.info.insert(name.to_string(), info.to_string());
        self
    }

    pub fn with_info(mut self, term: &str, info: &str) -> Self {
        self.info.insert(term.to_string(), info.to_string());
        self
    }

    pub fn with_chat(mut self, reply: &str) -> Self {
        self.chat_reply = Some(reply.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AgentService for MockAgent {
    async fn health(&self) -> Result<bool, AgentError> {
        self.record("health".to_string());
        Ok(self.healthy)
    }

    async fn list_protocols(&self) -> Result<ProtocolList, AgentError> {
        self.record("list".to_string());
        self.protocols
            .clone()
            .ok_or_else(|| AgentError::Network("listing offline".into()))
    }

    async fn protocol_info(&self, name: &str) -> Result<String, AgentError> {
        self.record(format!("info:{}", name));
        self.info
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::NotFound(name.to_string()))
    }

    async fn chat(&self, question: &str) -> Result<String, AgentError> {
        self.record(format!("chat:{}", question));
        self.chat_reply
            .clone()
            .ok_or_else(|| AgentError::Status(500))
    }
}
