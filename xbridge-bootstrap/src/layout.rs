//! Fixed binary layouts of the bootstrap and guardian-setting accounts.
//!
//! Both layouts are plain borsh structs made of 32-byte keys (plus one `u32`
//! for the guardian seed). There is no version tag and no length prefix:
//!
//! ```text
//! BootstrapConfig  (224 bytes)
//! ┌─────────────┬────────┬─────────────┬─────────────┬─────────────┬───────────┬──────────┐
//! │ certificate │ buffer │ bitcoin-spv │ two-way-peg │ liquidity   │ delegator │ layer-ca │
//! └─────────────┴────────┴─────────────┴─────────────┴─────────────┴───────────┴──────────┘
//!
//! Guardian setting account (8 + 164 bytes)
//! ┌───────────────┬──────────┬─────────────┬────────────┬───────────────┬────────────────┬────────────────┐
//! │ discriminator │ seed u32 │ certificate │ asset mint │ token program │ mint authority │ burn authority │
//! └───────────────┴──────────┴─────────────┴────────────┴───────────────┴────────────────┴────────────────┘
//! ```
//!
//! Decoding reads the fixed prefix and ignores any trailing bytes.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::BootstrapError;
use crate::pubkey::Pubkey;

/// Encoded size of [`BootstrapConfig`].
pub const BOOTSTRAP_CONFIG_LEN: usize = 7 * Pubkey::LEN;

/// Size of the account discriminator preceding a [`GuardianSetting`].
pub const GUARDIAN_DISCRIMINATOR_LEN: usize = 8;

/// Encoded size of a [`GuardianSetting`] body, discriminator excluded.
pub const GUARDIAN_SETTING_LEN: usize = 4 + 5 * Pubkey::LEN;

// ═══════════════════════════════════════════════════════════════════════════════
// BOOTSTRAP CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Program identifiers published by the bootstrapper program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BootstrapConfig {
    pub certificate: Pubkey,
    pub buffer_program_id: Pubkey,
    pub bitcoin_spv_program_id: Pubkey,
    pub two_way_peg_program_id: Pubkey,
    pub liquidity_management_program_id: Pubkey,
    pub delegator_program_id: Pubkey,
    pub layer_ca_program_id: Pubkey,
}

impl BootstrapConfig {
    /// Decode the account data of the bootstrap account.
    pub fn decode(data: &[u8]) -> Result<Self, BootstrapError> {
        decode_prefix(data, BOOTSTRAP_CONFIG_LEN, "bootstrap config")
    }

    /// Encode into the on-chain layout.
    pub fn encode(&self) -> Vec<u8> {
        self.fields()
            .iter()
            .flat_map(|key| key.as_bytes().iter().copied())
            .collect()
    }

    /// Fields in layout order.
    pub fn fields(&self) -> [Pubkey; 7] {
        [
            self.certificate,
            self.buffer_program_id,
            self.bitcoin_spv_program_id,
            self.two_way_peg_program_id,
            self.liquidity_management_program_id,
            self.delegator_program_id,
            self.layer_ca_program_id,
        ]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GUARDIAN SETTING
// ═══════════════════════════════════════════════════════════════════════════════

/// Asset configuration of a bridge guardian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GuardianSetting {
    pub seed: u32,
    pub guardian_certificate: Pubkey,
    pub asset_mint: Pubkey,
    pub token_program_id: Pubkey,
    pub mint_authority: Pubkey,
    pub burn_authority: Pubkey,
}

impl GuardianSetting {
    /// Decode full account data. The leading discriminator is skipped without
    /// checking its contents.
    pub fn decode_account(data: &[u8]) -> Result<Self, BootstrapError> {
        if data.len() < GUARDIAN_DISCRIMINATOR_LEN {
            return Err(BootstrapError::Decode(format!(
                "guardian setting account holds {} bytes, discriminator needs {}",
                data.len(),
                GUARDIAN_DISCRIMINATOR_LEN
            )));
        }
        Self::decode(&data[GUARDIAN_DISCRIMINATOR_LEN..])
    }

    /// Decode a body that has already had its discriminator removed.
    pub fn decode(body: &[u8]) -> Result<Self, BootstrapError> {
        decode_prefix(body, GUARDIAN_SETTING_LEN, "guardian setting")
    }

    /// Encode as full account data behind `discriminator`.
    pub fn encode_account(&self, discriminator: [u8; GUARDIAN_DISCRIMINATOR_LEN]) -> Vec<u8> {
        let mut out = Vec::with_capacity(GUARDIAN_DISCRIMINATOR_LEN + GUARDIAN_SETTING_LEN);
        out.extend_from_slice(&discriminator);
        out.extend_from_slice(&self.seed.to_le_bytes());
        for key in [
            self.guardian_certificate,
            self.asset_mint,
            self.token_program_id,
            self.mint_authority,
            self.burn_authority,
        ] {
            out.extend_from_slice(key.as_bytes());
        }
        out
    }
}

fn decode_prefix<T: BorshDeserialize>(
    data: &[u8],
    expected: usize,
    what: &str,
) -> Result<T, BootstrapError> {
    if data.len() < expected {
        return Err(BootstrapError::Decode(format!(
            "{} holds {} bytes, layout needs {}",
            what,
            data.len(),
            expected
        )));
    }
    let mut cursor = &data[..expected];
    T::deserialize(&mut cursor)
        .map_err(|e| BootstrapError::Decode(format!("{}: {}", what, e)))
}
