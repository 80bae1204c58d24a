//! Tiered answer routing.
//!
//! A question walks down the tiers until one produces text:
//!
//! ```text
//! Dispatched ─► remote chat ─┬─► RemoteAnswered
//!                            └─► RemoteFailed ─► protocol lookups* ─┬─► (answered)
//!                                                                   └─► keyword ─► FAQ ─► apology
//! ```
//!
//! Every call is sequential and no error escapes [`FaqRouter::answer`].

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::agent::AgentService;
use crate::availability::{Availability, AvailabilityPolicy};
use crate::canned::{FaqTable, KeywordCategory, NO_INFORMATION_REPLY};
use crate::catalog::ProtocolCatalog;
use crate::terms::candidate_terms;

/// Protocol info with fewer non-whitespace characters counts as a miss.
pub const MIN_PROTOCOL_INFO_CHARS: usize = 16;

/// States a question passes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteState {
    Dispatched,
    RemoteAnswered,
    RemoteFailed,
    ProtocolLookupAttempted(String),
    LocalAnswered,
}

/// Which tier produced an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerTier {
    RemoteChat,
    ProtocolInfo,
    Keyword,
    Faq,
    NoInformation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub tier: AnswerTier,
    pub trace: Vec<RouteState>,
}

impl Answer {
    /// Protocol terms that were looked up, in order.
    pub fn lookups(&self) -> Vec<&str> {
        self.trace
            .iter()
            .filter_map(|state| match state {
                RouteState::ProtocolLookupAttempted(term) => Some(term.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Send questions to the chat endpoint first.
    pub chat_enabled: bool,
    pub availability: AvailabilityPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            chat_enabled: true,
            availability: AvailabilityPolicy::default(),
        }
    }
}

pub struct FaqRouter {
    agent: Arc<dyn AgentService>,
    availability: Availability,
    chat_enabled: bool,
    catalog: OnceCell<ProtocolCatalog>,
    faq: FaqTable,
}

impl FaqRouter {
    pub fn new(agent: Arc<dyn AgentService>, config: RouterConfig) -> Self {
        Self {
            agent,
            availability: Availability::new(config.availability),
            chat_enabled: config.chat_enabled,
            catalog: OnceCell::new(),
            faq: FaqTable::standard(),
        }
    }

    /// Replace the FAQ table.
    pub fn with_faq(mut self, faq: FaqTable) -> Self {
        self.faq = faq;
        self
    }

    pub fn faq(&self) -> &FaqTable {
        &self.faq
    }

    pub async fn agent_available(&self) -> bool {
        self.availability.is_available(self.agent.as_ref()).await
    }

    /// Protocol catalog, fetched from the agent on first use.
    pub async fn catalog(&self) -> &ProtocolCatalog {
        self.catalog
            .get_or_init(|| async {
                match self.agent.list_protocols().await {
                    Ok(list) if !list.is_empty() => {
                        info!(count = list.len(), "loaded protocol catalog from agent");
                        ProtocolCatalog::from_map(list)
                    }
                    Ok(_) => {
                        debug!("agent listed no protocols, using built-in catalog");
                        ProtocolCatalog::fallback()
                    }
                    Err(e) => {
                        debug!("protocol listing unavailable ({}), using built-in catalog", e);
                        ProtocolCatalog::fallback()
                    }
                }
            })
            .await
    }

    /// Answer one question. Blank input is answered locally without any call.
    pub async fn answer(&self, question: &str) -> Answer {
        let mut trace = vec![RouteState::Dispatched];

        let available = !question.trim().is_empty() && self.agent_available().await;

        if available && self.chat_enabled {
            match self.agent.chat(question).await {
                Ok(text) if !text.trim().is_empty() => {
                    trace.push(RouteState::RemoteAnswered);
                    return Answer {
                        text,
                        tier: AnswerTier::RemoteChat,
                        trace,
                    };
                }
                Ok(_) => warn!("agent chat returned an empty answer"),
                Err(e) => warn!("agent chat failed: {}", e),
            }
        }
        trace.push(RouteState::RemoteFailed);

        if available {
            if let Some(text) = self.lookup_protocols(question, &mut trace).await {
                return Answer {
                    text,
                    tier: AnswerTier::ProtocolInfo,
                    trace,
                };
            }
        }

        let (text, tier) = self.answer_locally(question);
        trace.push(RouteState::LocalAnswered);
        Answer {
            text: text.to_string(),
            tier,
            trace,
        }
    }

    async fn lookup_protocols(&self, question: &str, trace: &mut Vec<RouteState>) -> Option<String> {
        let candidates = candidate_terms(question);
        if candidates.is_empty() {
            return None;
        }

        let catalog = self.catalog().await;
        let matched = candidates.iter().position(|term| catalog.contains(term));

        if let Some(index) = matched {
            if let Some(text) = self.try_protocol(&candidates[index], trace).await {
                return Some(text);
            }
        }

        for (index, term) in candidates.iter().enumerate() {
            if Some(index) == matched {
                continue;
            }
            if let Some(text) = self.try_protocol(term, trace).await {
                return Some(text);
            }
        }
        None
    }

    async fn try_protocol(&self, term: &str, trace: &mut Vec<RouteState>) -> Option<String> {
        trace.push(RouteState::ProtocolLookupAttempted(term.to_string()));
        match self.agent.protocol_info(term).await {
            Ok(text) if is_substantive(&text) => Some(text),
            Ok(_) => {
                debug!(term, "protocol info too short");
                None
            }
            Err(e) => {
                debug!(term, "protocol info failed: {}", e);
                None
            }
        }
    }

    fn answer_locally(&self, question: &str) -> (&str, AnswerTier) {
        if let Some(category) = KeywordCategory::detect(question) {
            return (category.reply(), AnswerTier::Keyword);
        }
        if let Some(entry) = self.faq.find_relevant(question) {
            return (entry.answer, AnswerTier::Faq);
        }
        (NO_INFORMATION_REPLY, AnswerTier::NoInformation)
    }
}

fn is_substantive(text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).count() >= MIN_PROTOCOL_INFO_CHARS
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::agent::mock::MockAgent;
    use crate::canned::FaqTable;

    const SOLANA_INFO: &str = "Solana is a high-throughput proof-of-stake chain.";

    fn router(agent: Arc<MockAgent>, chat_enabled: bool, availability: AvailabilityPolicy) -> FaqRouter {
        FaqRouter::new(
            agent,
            RouterConfig {
                chat_enabled,
                availability,
            },
        )
    }

    #[tokio::test]
    async fn remote_chat_answer_wins() {
        let agent = Arc::new(MockAgent::healthy().with_chat("Bridging takes minutes."));
        let answer = router(agent.clone(), true, AvailabilityPolicy::AssumeAvailable)
            .answer("how long does it take")
            .await;

        assert_eq!(answer.tier, AnswerTier::RemoteChat);
        assert_eq!(answer.text, "Bridging takes minutes.");
        assert_eq!(
            answer.trace,
            vec![RouteState::Dispatched, RouteState::RemoteAnswered]
        );
        assert_eq!(agent.calls(), vec!["chat:how long does it take"]);
    }

    #[tokio::test]
    async fn catalog_match_returns_protocol_info() {
        let agent = Arc::new(MockAgent::healthy().with_protocol("solana", "Solana", SOLANA_INFO));
        let answer = router(agent.clone(), true, AvailabilityPolicy::AssumeAvailable)
            .answer("Tell me about Solana")
            .await;

        assert_eq!(answer.tier, AnswerTier::ProtocolInfo);
        assert_eq!(answer.text, SOLANA_INFO);
        assert_eq!(answer.lookups(), vec!["solana"]);
        assert_eq!(
            agent.calls(),
            vec!["chat:Tell me about Solana", "list", "info:solana"]
        );
    }

    #[tokio::test]
    async fn catalog_match_is_tried_before_earlier_terms() {
        let agent = Arc::new(
            MockAgent::healthy()
                .with_protocol("solana", "Solana", SOLANA_INFO)
                .with_info("staking", "Staking locks tokens to secure a network."),
        );
        let answer = router(agent, false, AvailabilityPolicy::AssumeAvailable)
            .answer("staking on solana")
            .await;
        assert_eq!(answer.text, SOLANA_INFO);
        assert_eq!(answer.lookups(), vec!["solana"]);
    }

    #[tokio::test]
    async fn remaining_terms_are_tried_in_order() {
        let agent = Arc::new(
            MockAgent::healthy()
                .with_protocol("solana", "Solana", "too short")
                .with_info("staking", "Staking locks tokens to secure a network."),
        );
        let answer = router(agent, false, AvailabilityPolicy::AssumeAvailable)
            .answer("solana liquid staking")
            .await;

        assert_eq!(answer.tier, AnswerTier::ProtocolInfo);
        assert_eq!(answer.text, "Staking locks tokens to secure a network.");
        assert_eq!(answer.lookups(), vec!["solana", "liquid", "staking"]);
    }

    #[tokio::test]
    async fn greeting_when_agent_offline() {
        let agent = Arc::new(MockAgent::default());
        let answer = router(
            agent.clone(),
            true,
            AvailabilityPolicy::HealthChecked {
                ttl: Duration::from_secs(60),
            },
        )
        .answer("hello")
        .await;

        assert_eq!(answer.tier, AnswerTier::Keyword);
        assert_eq!(answer.text, KeywordCategory::Greeting.reply());
        assert_eq!(agent.calls(), vec!["health"]);
        assert!(answer.lookups().is_empty());
    }

    #[tokio::test]
    async fn walrus_gets_storage_reply_without_agent() {
        let agent = Arc::new(MockAgent::healthy());
        let answer = router(agent.clone(), true, AvailabilityPolicy::Disabled)
            .answer("walrus")
            .await;
        assert_eq!(answer.text, KeywordCategory::Storage.reply());
        assert!(agent.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_lookups_fall_through_to_keywords() {
        // "walrus" is in the built-in catalog but the agent has no info for it.
        let agent = Arc::new(MockAgent::healthy());
        let answer = router(agent, true, AvailabilityPolicy::AssumeAvailable)
            .answer("walrus")
            .await;
        assert_eq!(answer.tier, AnswerTier::Keyword);
        assert_eq!(answer.lookups(), vec!["walrus"]);
        assert_eq!(answer.trace.last(), Some(&RouteState::LocalAnswered));
    }

    #[tokio::test]
    async fn faq_then_apology() {
        let agent = Arc::new(MockAgent::default());
        let router = router(agent, false, AvailabilityPolicy::Disabled);

        let answer = router.answer("Can I move tokens?").await;
        assert_eq!(answer.tier, AnswerTier::Faq);
        assert_eq!(answer.text, FaqTable::standard().entries()[4].answer);

        let answer = router.answer("xyz qqq").await;
        assert_eq!(answer.tier, AnswerTier::NoInformation);
        assert_eq!(answer.text, NO_INFORMATION_REPLY);
    }

    #[tokio::test]
    async fn blank_question_makes_no_calls() {
        let agent = Arc::new(MockAgent::healthy().with_chat("unused"));
        let answer = router(agent.clone(), true, AvailabilityPolicy::AssumeAvailable)
            .answer("   ")
            .await;
        assert_eq!(answer.tier, AnswerTier::NoInformation);
        assert!(agent.calls().is_empty());
    }

    #[tokio::test]
    async fn catalog_is_loaded_once() {
        let agent = Arc::new(MockAgent::healthy());
        let router = router(agent.clone(), false, AvailabilityPolicy::AssumeAvailable);
        router.answer("ethereum").await;
        router.answer("bitcoin").await;
        let lists = agent.calls().iter().filter(|c| *c == "list").count();
        assert_eq!(lists, 1);
        // Listing failed, so the built-in catalog is in use.
        assert_eq!(router.catalog().await, &ProtocolCatalog::fallback());
    }

    #[test]
    fn substantive_ignores_whitespace() {
        assert!(!is_substantive("   short   text  "));
        assert!(is_substantive("sixteen chars ok"));
        assert!(!is_substantive(""));
    }
}
