//! Static replies used when the agent cannot answer.

use crate::terms::tokenize;

pub const WELCOME_MESSAGE: &str = "Hi there! How can I help you with Emrys bridge?";

pub const NO_INFORMATION_REPLY: &str = "I don't have specific information about that yet. \
You might want to check out our documentation or contact support for more details.";

/// Suggested question shown regardless of agent state.
pub const STORAGE_SUGGESTION: &str = "What is Walrus storage?";

/// Suggested question shown only while the agent is available.
pub const TECHNOLOGY_SUGGESTION: &str = "Tell me about blockchain technologies";

// ═══════════════════════════════════════════════════════════════════════════════
// KEYWORD CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Keyword categories, checked in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeywordCategory {
    Greeting,
    Thanks,
    Bridging,
    Storage,
    AssistantIdentity,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Greeting,
        KeywordCategory::Thanks,
        KeywordCategory::Bridging,
        KeywordCategory::Storage,
        KeywordCategory::AssistantIdentity,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Greeting => &["hello", "hi"],
            KeywordCategory::Thanks => &["thank"],
            KeywordCategory::Bridging => &["bridge", "transfer", "send"],
            KeywordCategory::Storage => &["walrus", "storage", "store"],
            KeywordCategory::AssistantIdentity => &["fetch", "agent", "uagent", "ai", "chat"],
        }
    }

    pub fn reply(&self) -> &'static str {
        match self {
            KeywordCategory::Greeting => "👋 Hello! How can I help you with Emrys today?",
            KeywordCategory::Thanks => {
                "You're welcome! Let me know if you have any other questions about Emrys."
            }
            KeywordCategory::Bridging => {
                "Emrys makes it easy to bridge tokens between chains. Just click 'Start Bridging' \
                 at the top and select your preferred network."
            }
            KeywordCategory::Storage => {
                "Emrys uses Walrus decentralized storage to securely store your transaction data \
                 across multiple networks. This ensures your data remains secure, immutable, and \
                 easily accessible regardless of which blockchain you're using."
            }
            KeywordCategory::AssistantIdentity => {
                "This chat assistant is powered by fetch.ai uAgents technology, which provides \
                 intelligent, context-aware interactions. It allows me to understand your \
                 questions and provide relevant information about Emrys."
            }
        }
    }

    /// First category with a keyword among the question's tokens.
    ///
    /// Keywords shorter than four characters must equal a token; longer ones
    /// match any token they prefix ("thank" matches "thanks").
    pub fn detect(question: &str) -> Option<KeywordCategory> {
        let tokens = tokenize(question);
        Self::ALL.into_iter().find(|category| {
            category
                .keywords()
                .iter()
                .any(|keyword| tokens.iter().any(|token| keyword_matches(keyword, token)))
        })
    }
}

fn keyword_matches(keyword: &str, token: &str) -> bool {
    if keyword.len() < 4 {
        token == keyword
    } else {
        token.starts_with(keyword)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FAQ TABLE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

const STANDARD_FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "What is Emrys?",
        answer: "Emrys is a cross-chain bridge for moving tokens between blockchains with low fees \
                 and strong security. It runs on our own forks of the SVM and IBC implementations.",
    },
    FaqEntry {
        question: "Which chains are supported?",
        answer: "Bridging is currently supported between Ethereum, Avalanche, Polygon, BSC and \
                 Solana. More chains are being added to the network.",
    },
    FaqEntry {
        question: "How do fees work?",
        answer: "Fees depend on the source and destination chains. Before you confirm a transfer \
                 you see a detailed breakdown of every fee involved.",
    },
    FaqEntry {
        question: "Is Emrys secure?",
        answer: "Yes. Emrys relies on well-studied cryptography and has been through security \
                 audits. The protocol is designed to keep cross-chain transfers safe end to end.",
    },
    FaqEntry {
        question: "What tokens can I bridge?",
        answer: "Native tokens such as ETH and AVAX can be bridged, as well as popular standards \
                 like USDC and USDT. Support for more tokens is added regularly.",
    },
    FaqEntry {
        question: "How long do transfers take?",
        answer: "It depends on the chains involved. Most transfers finish within a few minutes, \
                 though congested networks can take longer.",
    },
    FaqEntry {
        question: "What is Walrus storage?",
        answer: "Walrus is the decentralized storage layer that keeps transaction data across \
                 multiple networks, so your cross-chain records stay secure, immutable and \
                 available.",
    },
    FaqEntry {
        question: "How does Walrus work?",
        answer: "Walrus spreads encrypted fragments of transaction data over a distributed set of \
                 nodes. That gives durable storage and fast retrieval from whichever chain you \
                 are using.",
    },
    FaqEntry {
        question: "What technology powers this chat assistant?",
        answer: "The assistant runs on fetch.ai uAgents, an agent framework for autonomous, \
                 context-aware interactions and query handling.",
    },
];

/// Ordered question/answer pairs.
#[derive(Clone, Debug)]
pub struct FaqTable {
    entries: Vec<FaqEntry>,
}

impl FaqTable {
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_FAQ.to_vec(),
        }
    }

    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn questions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.question)
    }

    /// First entry whose question contains a user word longer than three
    /// characters.
    pub fn find_relevant(&self, question: &str) -> Option<&FaqEntry> {
        let words: Vec<String> = tokenize(question)
            .into_iter()
            .filter(|word| word.chars().count() > 3)
            .collect();
        if words.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            let faq_question = entry.question.to_lowercase();
            words.iter().any(|word| faq_question.contains(word.as_str()))
        })
    }
}

impl Default for FaqTable {
    fn default() -> Self {
        Self::standard()
    }
}
