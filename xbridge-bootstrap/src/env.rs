//! Public build-time configuration derived from a [`ResolvedConfig`].

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::BootstrapError;
use crate::resolver::{ProgramRole, ResolvedConfig};

pub const VERSION_KEY: &str = "NEXT_PUBLIC_VERSION";
pub const BOOTSTRAPPER_KEY: &str = "NEXT_PUBLIC_DEVNET_BOOTSTRAPPER_PROGRAM_ID";
pub const TWO_WAY_PEG_KEY: &str = "NEXT_PUBLIC_DEVNET_TWO_WAY_PEG_PROGRAM_ID";
pub const LIQUIDITY_MANAGEMENT_KEY: &str = "NEXT_PUBLIC_DEVNET_LIQUIDITY_MANAGEMENT_PROGRAM_ID";
pub const DELEGATOR_KEY: &str = "NEXT_PUBLIC_DEVNET_DELEGATOR_PROGRAM_ID";
pub const LAYER_CA_KEY: &str = "NEXT_PUBLIC_DEVNET_LAYER_CA_PROGRAM_ID";
pub const BITCOIN_SPV_KEY: &str = "NEXT_PUBLIC_DEVNET_BITCOIN_SPV_PROGRAM_ID";
pub const ASSET_MINT_KEY: &str = "NEXT_PUBLIC_REGTEST_ASSET_MINT";

/// Export key for a program role.
pub fn role_key(role: ProgramRole) -> &'static str {
    match role {
        ProgramRole::TwoWayPeg => TWO_WAY_PEG_KEY,
        ProgramRole::LiquidityManagement => LIQUIDITY_MANAGEMENT_KEY,
        ProgramRole::Delegator => DELEGATOR_KEY,
        ProgramRole::LayerCa => LAYER_CA_KEY,
        ProgramRole::BitcoinSpv => BITCOIN_SPV_KEY,
    }
}

/// Ordered `KEY=VALUE` pairs exposed to the front-end build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicEnv {
    entries: Vec<(&'static str, String)>,
}

impl PublicEnv {
    pub fn from_resolved(resolved: &ResolvedConfig, version: &str) -> Self {
        let mut entries = Vec::with_capacity(3 + ProgramRole::ALL.len());
        entries.push((VERSION_KEY, version.to_string()));
        entries.push((BOOTSTRAPPER_KEY, resolved.bootstrapper.clone()));
        for role in ProgramRole::ALL {
            entries.push((role_key(role), resolved.program_ids.get(role).to_string()));
        }
        entries.push((ASSET_MINT_KEY, resolved.asset_mint.to_string()));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }

    /// Render as dotenv text, one `KEY=VALUE` line per entry.
    pub fn to_dotenv(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    pub fn write_dotenv(&self, path: &Path) -> Result<(), BootstrapError> {
        fs::write(path, self.to_dotenv()).map_err(|e| {
            BootstrapError::InvalidConfig(format!("cannot write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubkey::{Pubkey, PLACEHOLDER_ID};
    use crate::resolver::{ProgramIdSet, Resolution};

    fn live() -> ResolvedConfig {
        ResolvedConfig {
            program_ids: ProgramIdSet {
                two_way_peg: Pubkey::new([4; 32]),
                liquidity_management: Pubkey::new([5; 32]),
                delegator: Pubkey::new([6; 32]),
                bitcoin_spv: Pubkey::new([3; 32]),
                layer_ca: Pubkey::new([7; 32]),
            },
            asset_mint: Pubkey::new([9; 32]),
            bootstrapper: "boot".to_string(),
            resolution: Resolution::Live,
        }
    }

    #[test]
    fn exports_every_key() {
        let env = PublicEnv::from_resolved(&live(), "1.2.3");
        assert_eq!(env.entries().len(), 8);
        assert_eq!(env.get(VERSION_KEY), Some("1.2.3"));
        assert_eq!(env.get(BOOTSTRAPPER_KEY), Some("boot"));
        assert_eq!(
            env.get(TWO_WAY_PEG_KEY),
            Some(Pubkey::new([4; 32]).to_string().as_str())
        );
        assert_eq!(
            env.get(BITCOIN_SPV_KEY),
            Some(Pubkey::new([3; 32]).to_string().as_str())
        );
        assert_eq!(
            env.get(ASSET_MINT_KEY),
            Some(Pubkey::new([9; 32]).to_string().as_str())
        );
    }

    #[test]
    fn fallback_exports_placeholders() {
        let env = PublicEnv::from_resolved(&ResolvedConfig::fallback(None, "offline"), "0.1.0");
        for role in ProgramRole::ALL {
            assert_eq!(env.get(role_key(role)), Some(PLACEHOLDER_ID));
        }
        assert_eq!(env.get(ASSET_MINT_KEY), Some(PLACEHOLDER_ID));
        assert_eq!(env.get(BOOTSTRAPPER_KEY), Some(PLACEHOLDER_ID));
    }

    #[test]
    fn dotenv_lines_are_ordered() {
        let text = PublicEnv::from_resolved(&live(), "1.2.3").to_dotenv();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NEXT_PUBLIC_VERSION=1.2.3");
        assert_eq!(lines[1], "NEXT_PUBLIC_DEVNET_BOOTSTRAPPER_PROGRAM_ID=boot");
        assert!(lines[7].starts_with("NEXT_PUBLIC_REGTEST_ASSET_MINT="));
    }

    #[test]
    fn json_and_file_output() {
        let env = PublicEnv::from_resolved(&live(), "1.2.3");
        let json = env.to_json();
        assert_eq!(json[VERSION_KEY], "1.2.3");
        assert_eq!(json.as_object().unwrap().len(), 8);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.production");
        env.write_dotenv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), env.to_dotenv());
    }

    #[test]
    fn unwritable_path_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(".env.production");
        let err = PublicEnv::from_resolved(&live(), "1.2.3")
            .write_dotenv(&path)
            .unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidConfig(msg) if msg.contains("missing")));
    }
}
