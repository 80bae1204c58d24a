//! Program-ID resolution with all-or-nothing fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BootstrapError;
use crate::layout::{BootstrapConfig, GuardianSetting};
use crate::pubkey::{Pubkey, PLACEHOLDER_ID};
use crate::rpc::{KeyedAccount, LedgerRpc};

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRAM ID SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Program roles exported to the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramRole {
    TwoWayPeg,
    LiquidityManagement,
    Delegator,
    BitcoinSpv,
    LayerCa,
}

impl ProgramRole {
    pub const ALL: [ProgramRole; 5] = [
        ProgramRole::TwoWayPeg,
        ProgramRole::LiquidityManagement,
        ProgramRole::Delegator,
        ProgramRole::LayerCa,
        ProgramRole::BitcoinSpv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramRole::TwoWayPeg => "two-way-peg",
            ProgramRole::LiquidityManagement => "liquidity-management",
            ProgramRole::Delegator => "delegator",
            ProgramRole::BitcoinSpv => "bitcoin-spv",
            ProgramRole::LayerCa => "layer-ca",
        }
    }
}

impl fmt::Display for ProgramRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved program identifiers, one per [`ProgramRole`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramIdSet {
    pub two_way_peg: Pubkey,
    pub liquidity_management: Pubkey,
    pub delegator: Pubkey,
    pub bitcoin_spv: Pubkey,
    pub layer_ca: Pubkey,
}

impl ProgramIdSet {
    /// Every role set to the placeholder identifier.
    pub fn fallback() -> Self {
        Self {
            two_way_peg: Pubkey::PLACEHOLDER,
            liquidity_management: Pubkey::PLACEHOLDER,
            delegator: Pubkey::PLACEHOLDER,
            bitcoin_spv: Pubkey::PLACEHOLDER,
            layer_ca: Pubkey::PLACEHOLDER,
        }
    }

    pub fn from_bootstrap(config: &BootstrapConfig) -> Self {
        Self {
            two_way_peg: config.two_way_peg_program_id,
            liquidity_management: config.liquidity_management_program_id,
            delegator: config.delegator_program_id,
            bitcoin_spv: config.bitcoin_spv_program_id,
            layer_ca: config.layer_ca_program_id,
        }
    }

    pub fn get(&self, role: ProgramRole) -> Pubkey {
        match role {
            ProgramRole::TwoWayPeg => self.two_way_peg,
            ProgramRole::LiquidityManagement => self.liquidity_management,
            ProgramRole::Delegator => self.delegator,
            ProgramRole::BitcoinSpv => self.bitcoin_spv,
            ProgramRole::LayerCa => self.layer_ca,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// How the values in a [`ResolvedConfig`] were obtained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Live,
    Fallback { reason: String },
}

/// Output of one resolver run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub program_ids: ProgramIdSet,
    pub asset_mint: Pubkey,
    /// Bootstrapper address as configured, or the placeholder.
    pub bootstrapper: String,
    pub resolution: Resolution,
}

impl ResolvedConfig {
    /// The placeholder set. Program ids and asset mint are always replaced
    /// together.
    pub fn fallback(bootstrapper: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            program_ids: ProgramIdSet::fallback(),
            asset_mint: Pubkey::PLACEHOLDER,
            bootstrapper: bootstrapper.unwrap_or(PLACEHOLDER_ID).to_string(),
            resolution: Resolution::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.resolution, Resolution::Fallback { .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Which program-owned account holds the bootstrap config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccountSelection {
    /// First account in RPC response order.
    #[default]
    First,
    /// Exactly one owned account must exist.
    Single,
}

impl FromStr for AccountSelection {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(AccountSelection::First),
            "single" => Ok(AccountSelection::Single),
            other => Err(BootstrapError::InvalidConfig(format!(
                "unknown account selection {:?}, expected first or single",
                other
            ))),
        }
    }
}

impl AccountSelection {
    fn select<'a>(
        &self,
        bootstrapper: &Pubkey,
        accounts: &'a [KeyedAccount],
    ) -> Result<&'a KeyedAccount, BootstrapError> {
        match (self, accounts) {
            (_, []) => Err(BootstrapError::NotFound(format!(
                "no accounts owned by bootstrapper {}",
                bootstrapper
            ))),
            (AccountSelection::First, [first, ..]) => Ok(first),
            (AccountSelection::Single, [only]) => Ok(only),
            (AccountSelection::Single, many) => Err(BootstrapError::NotFound(format!(
                "bootstrapper {} owns {} accounts, expected exactly one",
                bootstrapper,
                many.len()
            ))),
        }
    }
}

/// Resolver inputs. Addresses are kept as raw strings so that a malformed
/// value degrades to the fallback instead of aborting the build.
#[derive(Clone, Debug, Default)]
pub struct ResolverSettings {
    pub bootstrapper: Option<String>,
    pub guardian_setting: Option<String>,
    pub selection: AccountSelection,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads the bootstrap account (and optionally a guardian setting) from the
/// ledger.
pub struct ProgramIdResolver<R> {
    rpc: R,
    settings: ResolverSettings,
}

impl<R: LedgerRpc> ProgramIdResolver<R> {
    pub fn new(rpc: R, settings: ResolverSettings) -> Self {
        Self { rpc, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve, substituting the full fallback set on any failure.
    pub async fn resolve(&self) -> ResolvedConfig {
        match self.try_resolve().await {
            Ok(resolved) => {
                info!(
                    two_way_peg = %resolved.program_ids.two_way_peg,
                    liquidity_management = %resolved.program_ids.liquidity_management,
                    delegator = %resolved.program_ids.delegator,
                    bitcoin_spv = %resolved.program_ids.bitcoin_spv,
                    layer_ca = %resolved.program_ids.layer_ca,
                    asset_mint = %resolved.asset_mint,
                    "resolved program ids"
                );
                resolved
            }
            Err(e) => {
                warn!("failed to fetch bootstrap data, using fallback values: {}", e);
                ResolvedConfig::fallback(self.settings.bootstrapper.as_deref(), e.to_string())
            }
        }
    }

    /// Resolve without fallback. Nothing partial is returned: the first error
    /// aborts the whole run.
    pub async fn try_resolve(&self) -> Result<ResolvedConfig, BootstrapError> {
        let raw_bootstrapper = self.settings.bootstrapper.as_deref().ok_or_else(|| {
            BootstrapError::InvalidConfig("no bootstrapper program configured".into())
        })?;
        let bootstrapper = parse_address("bootstrapper", raw_bootstrapper)?;
        let guardian_setting = self
            .settings
            .guardian_setting
            .as_deref()
            .map(|raw| parse_address("guardian setting", raw))
            .transpose()?;

        let program_ids = self.fetch_program_ids(&bootstrapper).await?;
        let asset_mint = match guardian_setting {
            Some(address) => self.fetch_asset_mint(&address).await?,
            None => {
                debug!("no guardian setting configured, asset mint left as placeholder");
                Pubkey::PLACEHOLDER
            }
        };

        Ok(ResolvedConfig {
            program_ids,
            asset_mint,
            bootstrapper: raw_bootstrapper.to_string(),
            resolution: Resolution::Live,
        })
    }

    async fn fetch_program_ids(&self, bootstrapper: &Pubkey) -> Result<ProgramIdSet, BootstrapError> {
        let accounts = self.rpc.get_program_accounts(bootstrapper).await?;
        debug!(count = accounts.len(), "bootstrapper accounts fetched");

        let account = self.settings.selection.select(bootstrapper, &accounts)?;
        let config = BootstrapConfig::decode(&account.data)?;
        Ok(ProgramIdSet::from_bootstrap(&config))
    }

    async fn fetch_asset_mint(&self, guardian_setting: &Pubkey) -> Result<Pubkey, BootstrapError> {
        let data = self.rpc.get_account_data(guardian_setting).await?;
        let setting = GuardianSetting::decode_account(&data)?;
        Ok(setting.asset_mint)
    }
}

fn parse_address(what: &str, raw: &str) -> Result<Pubkey, BootstrapError> {
    raw.parse()
        .map_err(|e| BootstrapError::InvalidConfig(format!("{} address {:?}: {}", what, raw, e)))
}
