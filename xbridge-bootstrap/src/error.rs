//! Error types for bootstrap resolution.

use thiserror::Error;

/// Errors that can occur while resolving program identifiers.
///
/// None of these escape [`crate::ProgramIdResolver::resolve`]; they are
/// logged and replaced by the fallback set.
#[derive(Debug, Error)]
pub enum BootstrapError {
    // ═══════════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[error("ledger rpc unavailable: {0}")]
    Network(String),

    #[error("ledger rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════════
    // DATA ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[error("decode error: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        BootstrapError::InvalidResponse(err.to_string())
    }
}

impl From<reqwest::Error> for BootstrapError {
    fn from(err: reqwest::Error) -> Self {
        BootstrapError::Network(err.to_string())
    }
}
