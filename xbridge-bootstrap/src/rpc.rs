//! Read-only ledger RPC access.
//!
//! [`LedgerRpc`] is the seam the resolver talks to; [`SolanaRpcClient`] is the
//! JSON-RPC 2.0 implementation used by the build.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::BootstrapError;
use crate::pubkey::Pubkey;

/// Default devnet endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default request timeout.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(15);

/// An account together with its address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyedAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
}

/// Read-only ledger queries used during bootstrap.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// All accounts owned by `program_id`, in server order.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<KeyedAccount>, BootstrapError>;

    /// Raw data of the account at `address`.
    ///
    /// Returns [`BootstrapError::NotFound`] when the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, BootstrapError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON-RPC CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for [`SolanaRpcClient`].
#[derive(Clone, Debug)]
pub struct RpcConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Commitment level sent with every query.
    pub commitment: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            timeout: DEFAULT_RPC_TIMEOUT,
            commitment: "confirmed".to_string(),
        }
    }
}

/// Solana JSON-RPC client over HTTP.
pub struct SolanaRpcClient {
    config: RpcConfig,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl SolanaRpcClient {
    /// Create a new client.
    pub fn new(config: RpcConfig) -> Result<Self, BootstrapError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BootstrapError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a client for a specific URL with default settings.
    pub fn with_url(url: impl Into<String>) -> Result<Self, BootstrapError> {
        Self::new(RpcConfig {
            url: url.into(),
            ..Default::default()
        })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, BootstrapError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, url = %self.config.url, "ledger rpc call");

        let response = self
            .http_client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BootstrapError::Network(format!("{}: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BootstrapError::Network(format!(
                "{}: HTTP {}: {}",
                method, status, body
            )));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| BootstrapError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = envelope.error {
            return Err(BootstrapError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| BootstrapError::InvalidResponse(format!("{}: missing result", method)))
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpcClient {
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<KeyedAccount>, BootstrapError> {
        let params = json!([
            program_id.to_string(),
            { "encoding": "base64", "commitment": self.config.commitment },
        ]);
        let accounts: Vec<RpcKeyedAccount> = self.rpc_call("getProgramAccounts", params).await?;

        accounts
            .into_iter()
            .map(|keyed| {
                let pubkey = keyed.pubkey.parse::<Pubkey>().map_err(|e| {
                    BootstrapError::InvalidResponse(format!("account key {}: {}", keyed.pubkey, e))
                })?;
                let data = keyed.account.decode_data()?;
                Ok(KeyedAccount { pubkey, data })
            })
            .collect()
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, BootstrapError> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": self.config.commitment },
        ]);
        let info: RpcAccountInfo = self.rpc_call("getAccountInfo", params).await?;

        match info.value {
            Some(account) => account.decode_data(),
            None => Err(BootstrapError::NotFound(format!("account {}", address))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RPC TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcKeyedAccount {
    pubkey: String,
    account: RpcAccount,
}

#[derive(Deserialize)]
struct RpcAccountInfo {
    value: Option<RpcAccount>,
}

/// Account as returned with `"encoding": "base64"`: `data` is `[blob, encoding]`.
#[derive(Deserialize)]
struct RpcAccount {
    data: (String, String),
}

impl RpcAccount {
    fn decode_data(&self) -> Result<Vec<u8>, BootstrapError> {
        let (blob, encoding) = &self.data;
        if encoding != "base64" {
            return Err(BootstrapError::InvalidResponse(format!(
                "unexpected account encoding {}",
                encoding
            )));
        }
        STANDARD
            .decode(blob)
            .map_err(|e| BootstrapError::Decode(format!("account data: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_devnet() {
        let config = RpcConfig::default();
        assert_eq!(config.url, DEFAULT_RPC_URL);
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn parses_program_accounts_payload() {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [{
                "pubkey": "11111111111111111111111111111111",
                "account": {
                    "data": [STANDARD.encode([1u8, 2, 3]), "base64"],
                    "executable": false,
                    "lamports": 1_000_000,
                    "owner": "11111111111111111111111111111111",
                    "rentEpoch": 0
                }
            }]
        });
        let envelope: RpcEnvelope<Vec<RpcKeyedAccount>> = serde_json::from_value(payload).unwrap();
        let accounts = envelope.result.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account.decode_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_non_base64_encoding() {
        let account = RpcAccount {
            data: ("abc".to_string(), "base58".to_string()),
        };
        assert!(matches!(
            account.decode_data(),
            Err(BootstrapError::InvalidResponse(_))
        ));
    }

    #[test]
    fn null_account_value_parses() {
        let info: RpcAccountInfo =
            serde_json::from_value(json!({ "context": { "slot": 1 }, "value": null })).unwrap();
        assert!(info.value.is_none());
    }
}
