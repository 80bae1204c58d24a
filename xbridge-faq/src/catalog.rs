//! Known protocol names.

use std::collections::BTreeMap;

/// Protocols served by the reference agent, used when the remote list is
/// unavailable.
const FALLBACK_PROTOCOLS: &[(&str, &str)] = &[
    ("avalanche", "Avalanche"),
    ("bitcoin", "Bitcoin"),
    ("cosmos", "Cosmos"),
    ("ethereum", "Ethereum"),
    ("ibc", "Inter-Blockchain Communication"),
    ("osmosis", "Osmosis"),
    ("polkadot", "Polkadot"),
    ("polygon", "Polygon"),
    ("solana", "Solana"),
    ("solend", "Solend"),
    ("svm", "Solana Virtual Machine"),
    ("walrus", "Walrus"),
    ("zpl", "ZPL UTXO Bridge"),
];

/// Short name to display name. Keys are stored lower-case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolCatalog {
    entries: BTreeMap<String, String>,
}

impl ProtocolCatalog {
    pub fn fallback() -> Self {
        Self::from_map(
            FALLBACK_PROTOCOLS
                .iter()
                .map(|(name, display)| (name.to_string(), display.to_string())),
        )
    }

    pub fn from_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, display)| (name.trim().to_lowercase(), display))
                .filter(|(name, _)| !name.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive lookup on the short name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
