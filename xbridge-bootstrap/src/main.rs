//! xbridge-bootstrap
//!
//! Build step that resolves bridge program identifiers and writes them as
//! public configuration for the front-end build.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use xbridge_bootstrap::{
    BootstrapEnvConfig, ProgramIdResolver, PublicEnv, ResolvedConfig, SolanaRpcClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `KEY=VALUE` lines.
    Dotenv,
    /// A single JSON object.
    Json,
}

#[derive(Parser)]
#[command(
    name = "xbridge-bootstrap",
    about = "Resolve bridge program ids from the bootstrapper account"
)]
struct Cli {
    /// Ledger JSON-RPC endpoint (overrides SOLANA_DEVNET_RPC).
    #[arg(long)]
    rpc_url: Option<String>,
    /// Bootstrapper program address.
    #[arg(long)]
    bootstrapper: Option<String>,
    /// Guardian setting account address.
    #[arg(long)]
    guardian_setting: Option<String>,
    /// Bootstrap account selection rule: first or single.
    #[arg(long)]
    selection: Option<String>,
    /// RPC request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Dotenv)]
    format: OutputFormat,
    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Export even when running under CI.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xbridge_bootstrap=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = BootstrapEnvConfig::from_env()?;
    apply_overrides(&mut config, &cli)?;

    if config.in_ci && !cli.force {
        info!("GITHUB_ACTIONS is set, skipping public env export");
        return Ok(());
    }

    info!("Ledger RPC: {}", config.rpc_url);
    let resolved = resolve(&config).await;
    let env = PublicEnv::from_resolved(&resolved, &config.version);

    match (&cli.out, cli.format) {
        (Some(path), OutputFormat::Dotenv) => {
            env.write_dotenv(path)?;
            info!("Wrote {}", path.display());
        }
        (Some(path), OutputFormat::Json) => {
            std::fs::write(path, serde_json::to_string_pretty(&env.to_json())?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        (None, OutputFormat::Dotenv) => print!("{}", env.to_dotenv()),
        (None, OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&env.to_json())?),
    }

    Ok(())
}

fn apply_overrides(config: &mut BootstrapEnvConfig, cli: &Cli) -> Result<()> {
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = url.clone();
    }
    if let Some(bootstrapper) = &cli.bootstrapper {
        config.bootstrapper = Some(bootstrapper.clone());
    }
    if let Some(guardian) = &cli.guardian_setting {
        config.guardian_setting = Some(guardian.clone());
    }
    if let Some(selection) = &cli.selection {
        config.selection = selection.parse().context("invalid --selection")?;
    }
    if let Some(secs) = cli.timeout_secs {
        config.rpc_timeout = Duration::from_secs(secs);
    }
    Ok(())
}

async fn resolve(config: &BootstrapEnvConfig) -> ResolvedConfig {
    match SolanaRpcClient::new(config.rpc_config()) {
        Ok(client) => {
            ProgramIdResolver::new(client, config.resolver_settings())
                .resolve()
                .await
        }
        Err(e) => {
            warn!("failed to build ledger rpc client, using fallback values: {}", e);
            ResolvedConfig::fallback(config.bootstrapper.as_deref(), e.to_string())
        }
    }
}
