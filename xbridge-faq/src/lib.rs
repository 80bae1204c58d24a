//! xbridge-faq
//!
//! Answers bridge FAQ questions. A question is first sent to the remote
//! agent's chat endpoint, then matched against protocol names the agent can
//! describe, and finally answered from static keyword replies and the FAQ
//! table. The user always gets a reply.

pub mod agent;
pub mod availability;
pub mod canned;
pub mod catalog;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod terms;

pub use agent::{
    connect, AgentClientConfig, AgentService, AgentTransport, EnvelopeAgentClient,
    RestAgentClient, AGENT_CONTRACT_VERSION,
};
pub use availability::{Availability, AvailabilityPolicy};
pub use canned::{FaqEntry, FaqTable, KeywordCategory, NO_INFORMATION_REPLY, WELCOME_MESSAGE};
pub use catalog::ProtocolCatalog;
pub use config::FaqConfig;
pub use error::AgentError;
pub use router::{Answer, AnswerTier, FaqRouter, RouteState, RouterConfig};
pub use session::{ChatMessage, ChatSession, Origin};
pub use terms::candidate_terms;
