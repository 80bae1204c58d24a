//! xbridge-agent library
//!
//! Axum HTTP service answering protocol-info and chat questions for the FAQ
//! assistant.
//!
//! # Endpoints
//! - `GET /health`
//! - `GET /protocols/list`
//! - `POST /protocol/info`
//! - `POST /chat/question`
//! - `POST /submit` (message envelope carrying either of the two above)

use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod error;
pub mod knowledge;

pub use error::ApiError;
pub use knowledge::KnowledgeBase;

const AGENT_ADDRESS_ENV: &str = "AGENT_ADDRESS";
const DEFAULT_AGENT_ADDRESS: &str = "agent://xbridge-protocol-info";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub agent_address: String,
    pub knowledge: Arc<KnowledgeBase>,
}

impl AppState {
    pub fn new(agent_address: impl Into<String>, knowledge: KnowledgeBase) -> Self {
        Self {
            agent_address: agent_address.into(),
            knowledge: Arc::new(knowledge),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        let agent_address = env::var(AGENT_ADDRESS_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_ADDRESS.to_string());
        Self::new(agent_address, KnowledgeBase::builtin())
    }
}

/// Build the router with state from the environment.
pub fn app_router() -> Router {
    app_router_with_state(AppState::default())
}

/// Build the router.
pub fn app_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/protocols/list", get(list_protocols))
        .route("/protocol/info", post(protocol_info))
        .route("/chat/question", post(chat_question))
        .route("/submit", post(submit))
        .layer(cors)
        .with_state(state)
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": now(),
    }))
}

async fn list_protocols(State(state): State<AppState>) -> impl IntoResponse {
    let protocols = state.knowledge.protocol_names();
    Json(serde_json::json!({
        "timestamp": now(),
        "count": protocols.len(),
        "protocols": protocols,
    }))
}

/// Protocol info request. Either spelling of the name is accepted;
/// `protocolName` wins when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct ProtocolInfoRequest {
    pub protocol_name: Option<String>,
    #[serde(rename = "protocolName")]
    pub protocol_name_camel: Option<String>,
}

impl ProtocolInfoRequest {
    fn name(self) -> Option<String> {
        self.protocol_name_camel
            .or(self.protocol_name)
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ProtocolInfoResponse {
    pub timestamp: u64,
    pub protocol_name: String,
    pub information: String,
    pub agent_address: String,
}

async fn protocol_info(
    State(state): State<AppState>,
    Json(req): Json<ProtocolInfoRequest>,
) -> Result<(StatusCode, Json<ProtocolInfoResponse>), ApiError> {
    let name = req.name().ok_or(ApiError::MissingField("protocolName"))?;
    info!("protocol info requested for {}", name);

    let (status, information) = describe(&state, &name);
    Ok((
        status,
        Json(ProtocolInfoResponse {
            timestamp: now(),
            protocol_name: name,
            information,
            agent_address: state.agent_address.clone(),
        }),
    ))
}

fn describe(state: &AppState, name: &str) -> (StatusCode, String) {
    match state.knowledge.describe(name) {
        Some(info) => (StatusCode::OK, info),
        None => (StatusCode::NOT_FOUND, knowledge::no_information(name)),
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatQuestionRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatQuestionResponse {
    pub timestamp: u64,
    pub question: String,
    pub answer: String,
    pub agent_address: String,
}

async fn chat_question(
    State(state): State<AppState>,
    Json(req): Json<ChatQuestionRequest>,
) -> Result<Json<ChatQuestionResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::MissingField("question"));
    }
    info!("chat question received");

    let answer = state.knowledge.answer(&req.question);
    Ok(Json(ChatQuestionResponse {
        timestamp: now(),
        question: req.question,
        answer,
        agent_address: state.agent_address.clone(),
    }))
}

/// Message envelope posted to `/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitEnvelope {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub destination: String,
    pub message: Value,
}

async fn submit(
    State(state): State<AppState>,
    Json(envelope): Json<SubmitEnvelope>,
) -> Result<impl IntoResponse, ApiError> {
    info!(sender = %envelope.sender, destination = %envelope.destination, "envelope received");

    if let Some(question) = envelope.message.get("question").and_then(Value::as_str) {
        if question.trim().is_empty() {
            return Err(ApiError::MissingField("question"));
        }
        let answer = state.knowledge.answer(question);
        return Ok((StatusCode::OK, Json(serde_json::json!({ "results": answer }))));
    }

    let request: ProtocolInfoRequest =
        serde_json::from_value(envelope.message.clone()).unwrap_or_default();
    let name = request
        .name()
        .ok_or_else(|| ApiError::UnsupportedMessage(envelope.message.to_string()))?;
    let (status, information) = describe(&state, &name);
    Ok((status, Json(serde_json::json!({ "results": information }))))
}
