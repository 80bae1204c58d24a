//! Protocol descriptions and canned chat answers served by the agent.

use std::collections::BTreeMap;

/// One protocol the agent can describe.
#[derive(Clone, Copy, Debug)]
pub struct ProtocolEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub summary: &'static str,
}

const PROTOCOLS: &[ProtocolEntry] = &[
    ProtocolEntry {
        key: "avalanche",
        name: "Avalanche",
        aliases: &["avax"],
        summary: "Avalanche is a smart-contract platform built from subnets. Its C-Chain is EVM \
                  compatible and reaches finality in about a second using the Snowman consensus \
                  protocol.",
    },
    ProtocolEntry {
        key: "bitcoin",
        name: "Bitcoin",
        aliases: &["btc"],
        summary: "Bitcoin is the original proof-of-work blockchain. It uses a UTXO model and a \
                  limited scripting language, and bridges usually rely on SPV proofs of Bitcoin \
                  block headers to verify deposits.",
    },
    ProtocolEntry {
        key: "cosmos",
        name: "Cosmos",
        aliases: &["atom"],
        summary: "Cosmos is an ecosystem of application-specific chains built with the Cosmos SDK \
                  and CometBFT consensus. Chains in the ecosystem exchange tokens and messages \
                  over IBC.",
    },
    ProtocolEntry {
        key: "ethereum",
        name: "Ethereum",
        aliases: &["eth"],
        summary: "Ethereum is a proof-of-stake smart-contract platform running the EVM. Most token \
                  standards used on other chains, such as ERC-20, originate there.",
    },
    ProtocolEntry {
        key: "ibc",
        name: "Inter-Blockchain Communication",
        aliases: &["inter-blockchain communication"],
        summary: "IBC is a protocol for authenticated message passing between chains. Light \
                  clients on each side verify the other chain's headers, so transfers do not \
                  depend on a trusted intermediary.",
    },
    ProtocolEntry {
        key: "osmosis",
        name: "Osmosis",
        aliases: &["osmo"],
        summary: "Osmosis is a Cosmos SDK chain hosting an automated market maker. It is one of the \
                  main liquidity hubs for IBC-connected assets.",
    },
    ProtocolEntry {
        key: "polkadot",
        name: "Polkadot",
        aliases: &["dot"],
        summary: "Polkadot is a sharded network where parachains share the security of a central \
                  relay chain and communicate through cross-consensus messaging (XCM).",
    },
    ProtocolEntry {
        key: "polygon",
        name: "Polygon",
        aliases: &["matic"],
        summary: "Polygon is a family of Ethereum scaling networks. Its proof-of-stake chain is EVM \
                  compatible and periodically checkpoints state to Ethereum.",
    },
    ProtocolEntry {
        key: "solana",
        name: "Solana",
        aliases: &["sol"],
        summary: "Solana is a high-throughput proof-of-stake chain. Programs run in the Sealevel \
                  runtime, which executes non-overlapping transactions in parallel.",
    },
    ProtocolEntry {
        key: "solend",
        name: "Solend",
        aliases: &[],
        summary: "Solend is a lending protocol on Solana. Users deposit assets to earn interest and \
                  borrow against their deposits under over-collateralisation rules.",
    },
    ProtocolEntry {
        key: "svm",
        name: "Solana Virtual Machine",
        aliases: &["soon svm", "soon", "solana virtual machine"],
        summary: "The Solana Virtual Machine executes Solana programs. Forks of the SVM run as \
                  independent chains or rollups, which is how Emrys hosts its bridge programs.",
    },
    ProtocolEntry {
        key: "walrus",
        name: "Walrus",
        aliases: &[],
        summary: "Walrus is a decentralized blob storage network. Data is erasure coded across \
                  storage nodes, keeping it available even when a share of nodes is offline.",
    },
    ProtocolEntry {
        key: "zpl",
        name: "ZPL UTXO Bridge",
        aliases: &["utxo", "zpl utxo bridge", "utxo bridge"],
        summary: "The ZPL UTXO bridge moves Bitcoin into the SVM. Deposits are locked on Bitcoin, \
                  proven with SPV proofs, and represented by a token minted by the two-way peg \
                  program.",
    },
];

/// Protocols checked first when a chat question names a well-known chain.
const COMMON_PROTOCOLS: &[&str] = &[
    "ethereum", "solana", "bitcoin", "polygon", "avalanche", "cosmos", "polkadot",
];

struct ChatTopic {
    keywords: &'static [&'static str],
    answer: &'static str,
}

const CHAT_TOPICS: &[ChatTopic] = &[
    ChatTopic {
        keywords: &["bridge", "transfer", "send"],
        answer: "Emrys bridge moves tokens between blockchains quickly and securely. Pick the \
                 source and destination chains, the token and the amount, and the bridge does the \
                 rest.",
    },
    ChatTopic {
        keywords: &["wallet", "connect"],
        answer: "You need a compatible wallet on both the source and the destination chain. \
                 Several providers are supported, including MetaMask and Phantom.",
    },
    ChatTopic {
        keywords: &["fee", "cost", "price"],
        answer: "Fees depend on the source and destination chains. A breakdown of gas and \
                 interchain fees is shown before you confirm a transfer.",
    },
    ChatTopic {
        keywords: &["security", "safe", "secure"],
        answer: "Security comes first at Emrys. The bridge uses well-studied cryptography and has \
                 been audited to protect assets for the whole transfer.",
    },
    ChatTopic {
        keywords: &["time", "duration", "long", "wait"],
        answer: "Most transfers complete within a few minutes, depending on network conditions \
                 and the chains involved. Transfer status can be tracked live.",
    },
    ChatTopic {
        keywords: &["walrus", "storage"],
        answer: "Walrus is the decentralized storage layer that keeps transaction data across \
                 multiple networks, so cross-chain records stay secure, immutable and available.",
    },
    ChatTopic {
        keywords: &["token", "asset", "cryptocurrency"],
        answer: "Native tokens such as ETH, AVAX and SOL can be bridged, along with standards like \
                 USDC and USDT. More tokens are added over time.",
    },
];

const GENERIC_ANSWER: &str = "I'm here to help you navigate Emrys bridge! Ask about supported \
chains, tokens, fees, security or anything else about the bridge. For technical issues, please \
contact the support team.";

/// Lookup table behind the agent endpoints.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    protocols: Vec<ProtocolEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        Self {
            protocols: PROTOCOLS.to_vec(),
        }
    }

    /// Short name to display name.
    pub fn protocol_names(&self) -> BTreeMap<String, String> {
        self.protocols
            .iter()
            .map(|p| (p.key.to_string(), p.name.to_string()))
            .collect()
    }

    /// Find a protocol by key, display name or alias, ignoring case.
    pub fn find(&self, name: &str) -> Option<&ProtocolEntry> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.protocols.iter().find(|p| {
            p.key == wanted || p.name.to_lowercase() == wanted || p.aliases.contains(&wanted.as_str())
        })
    }

    /// Description of `name`, if known.
    pub fn describe(&self, name: &str) -> Option<String> {
        self.find(name)
            .map(|p| format!("{} ({}): {}", p.name, p.key, p.summary))
    }

    /// Answer a free-text question.
    pub fn answer(&self, question: &str) -> String {
        let words = words(question);

        if let Some(info) = words
            .iter()
            .find(|w| COMMON_PROTOCOLS.contains(&w.as_str()))
            .and_then(|w| self.describe(w))
        {
            return info;
        }

        CHAT_TOPICS
            .iter()
            .find(|topic| {
                topic
                    .keywords
                    .iter()
                    .any(|keyword| words.iter().any(|w| w.starts_with(keyword)))
            })
            .map(|topic| topic.answer)
            .unwrap_or(GENERIC_ANSWER)
            .to_string()
    }
}

pub fn no_information(name: &str) -> String {
    format!("No information available about {}.", name.trim())
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_by_key_name_and_alias() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.find("SOLANA").unwrap().key, "solana");
        assert_eq!(kb.find("Inter-Blockchain Communication").unwrap().key, "ibc");
        assert_eq!(kb.find("SOON SVM").unwrap().key, "svm");
        assert_eq!(kb.find("ZPL UTXO Bridge").unwrap().key, "zpl");
        assert!(kb.find("").is_none());
        assert!(kb.find("dogecoin").is_none());
    }

    #[test]
    fn chat_prefers_common_protocols() {
        let kb = KnowledgeBase::builtin();
        let answer = kb.answer("How fast is Solana?");
        assert!(answer.starts_with("Solana (solana)"));
    }

    #[test]
    fn chat_topics_in_order() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.answer("how do I bridge USDC").contains("moves tokens"));
        assert!(kb.answer("what are the fees?").contains("Fees depend"));
        assert!(kb.answer("connect my wallet").contains("compatible wallet"));
        assert_eq!(kb.answer("good morning"), GENERIC_ANSWER);
    }

    #[test]
    fn names_cover_every_protocol() {
        let names = KnowledgeBase::builtin().protocol_names();
        assert_eq!(names.len(), PROTOCOLS.len());
        assert_eq!(names["walrus"], "Walrus");
    }
}
