//! Environment configuration for the bootstrap resolver.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::resolver::{AccountSelection, ResolverSettings};
use crate::rpc::{RpcConfig, DEFAULT_RPC_TIMEOUT, DEFAULT_RPC_URL};

/// Resolver configuration read from the environment.
#[derive(Clone, Debug)]
pub struct BootstrapEnvConfig {
    /// Ledger JSON-RPC endpoint.
    pub rpc_url: String,
    /// Bootstrapper program address.
    pub bootstrapper: Option<String>,
    /// Guardian setting account address.
    pub guardian_setting: Option<String>,
    pub selection: AccountSelection,
    pub rpc_timeout: Duration,
    /// Value exported as `NEXT_PUBLIC_VERSION`.
    pub version: String,
    /// Set when running under GitHub Actions.
    pub in_ci: bool,
}

impl BootstrapEnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let rpc_url = non_empty("SOLANA_DEVNET_RPC").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let bootstrapper = non_empty("NEXT_PUBLIC_DEVNET_BOOTSTRAPPER_PROGRAM_ID");
        let guardian_setting = non_empty("NEXT_PUBLIC_REGTEST_DEVNET_TWO_WAY_PEG_GUARDIAN_SETTING");

        let selection = match non_empty("BOOTSTRAP_ACCOUNT_SELECTION") {
            Some(raw) => raw
                .parse::<AccountSelection>()
                .context("BOOTSTRAP_ACCOUNT_SELECTION must be first or single")?,
            None => AccountSelection::First,
        };

        let rpc_timeout = match non_empty("BOOTSTRAP_RPC_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .context("BOOTSTRAP_RPC_TIMEOUT_SECS must be a number of seconds")?,
            ),
            None => DEFAULT_RPC_TIMEOUT,
        };

        let version =
            non_empty("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let in_ci = env::var_os("GITHUB_ACTIONS").is_some();

        Ok(Self {
            rpc_url,
            bootstrapper,
            guardian_setting,
            selection,
            rpc_timeout,
            version,
            in_ci,
        })
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.rpc_url.clone(),
            timeout: self.rpc_timeout,
            ..Default::default()
        }
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            bootstrapper: self.bootstrapper.clone(),
            guardian_setting: self.guardian_setting.clone(),
            selection: self.selection,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
