//! xbridge-bootstrap
//!
//! Resolves the bridge program identifiers published by the bootstrapper
//! program and exports them as public build-time configuration.
//!
//! ## Flow
//!
//! 1. `getProgramAccounts` on the bootstrapper program
//! 2. Decode the selected account as a [`BootstrapConfig`]
//! 3. Optionally read the guardian setting account for the asset mint
//! 4. Render a [`PublicEnv`] for the front-end build
//!
//! Any failure in steps 1 to 3 yields the all-placeholder set. The build never
//! fails because the ledger was unreachable.

pub mod config;
pub mod env;
pub mod error;
pub mod layout;
pub mod pubkey;
pub mod resolver;
pub mod rpc;

pub use config::BootstrapEnvConfig;
pub use env::PublicEnv;
pub use error::BootstrapError;
pub use layout::{BootstrapConfig, GuardianSetting};
pub use pubkey::{Pubkey, PLACEHOLDER_ID};
pub use resolver::{
    AccountSelection, ProgramIdResolver, ProgramIdSet, ProgramRole, Resolution, ResolvedConfig,
    ResolverSettings,
};
pub use rpc::{KeyedAccount, LedgerRpc, RpcConfig, SolanaRpcClient};
