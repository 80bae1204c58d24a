//! xbridge-faq
//!
//! Command-line front-end for the FAQ assistant.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use xbridge_faq::availability::DEFAULT_HEALTH_TTL;
use xbridge_faq::config::parse_availability;
use xbridge_faq::{
    connect, AgentTransport, AvailabilityPolicy, ChatSession, FaqConfig, FaqRouter,
};

#[derive(Parser)]
#[command(name = "xbridge-faq", about = "Ask the Emrys bridge FAQ assistant")]
struct Cli {
    #[command(flatten)]
    agent: AgentArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AgentArgs {
    /// Agent base URL (overrides NEXT_PUBLIC_UAGENT_URL).
    #[arg(long, global = true)]
    agent_url: Option<String>,
    /// Agent transport: rest or envelope.
    #[arg(long, global = true)]
    transport: Option<String>,
    /// Availability policy: health, always or disabled.
    #[arg(long, global = true)]
    availability: Option<String>,
    /// Skip the remote chat endpoint.
    #[arg(long, global = true)]
    no_chat: bool,
    /// Agent request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and exit.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
        /// Print the routing trace.
        #[arg(long)]
        trace: bool,
    },
    /// Interactive session on stdin.
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xbridge_faq=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = FaqConfig::from_env()?;
    apply_overrides(&mut config, &cli.agent)?;

    info!(
        "Agent: {} ({}, availability {})",
        config.agent_url, config.transport, config.availability
    );

    let agent = connect(config.client_config()).context("failed to build agent client")?;
    let router = Arc::new(FaqRouter::new(agent, config.router_config()));
    let mut session = ChatSession::new(router);

    match cli.command {
        Commands::Ask { question, trace } => {
            let question = question.join(" ");
            if let Some(answer) = session.submit(&question).await {
                println!("{}", answer.text);
                if trace {
                    eprintln!("tier: {:?}", answer.tier);
                    eprintln!("trace: {:?}", answer.trace);
                }
            }
            Ok(())
        }
        Commands::Chat => run_chat(&mut session).await,
    }
}

fn apply_overrides(config: &mut FaqConfig, args: &AgentArgs) -> Result<()> {
    if let Some(url) = &args.agent_url {
        config.agent_url = url.clone();
    }
    if let Some(transport) = &args.transport {
        config.transport = transport
            .parse::<AgentTransport>()
            .map_err(|e: String| anyhow!(e))
            .context("invalid --transport")?;
    }
    if let Some(availability) = &args.availability {
        let ttl = match config.availability {
            AvailabilityPolicy::HealthChecked { ttl } => ttl,
            _ => DEFAULT_HEALTH_TTL,
        };
        config.availability = parse_availability(availability, ttl)?;
    }
    if args.no_chat {
        config.chat_enabled = false;
    }
    if let Some(secs) = args.timeout_secs {
        config.agent_timeout = Duration::from_secs(secs);
    }
    Ok(())
}

async fn run_chat(session: &mut ChatSession) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for message in session.history() {
        stdout.write_all(format!("{}\n", message.text).as_bytes()).await?;
    }
    let suggestions = session.suggested_questions().await;
    stdout.write_all(b"\nSuggested questions:\n").await?;
    for (i, question) in suggestions.iter().enumerate() {
        stdout
            .write_all(format!("  {}. {}\n", i + 1, question).as_bytes())
            .await?;
    }
    stdout
        .write_all(b"\nType a question, a suggestion number, or 'exit'.\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }

        let question = match input.parse::<usize>() {
            Ok(n) if (1..=suggestions.len()).contains(&n) => suggestions[n - 1].as_str(),
            _ => input,
        };
        if !session.ask(question) {
            continue;
        }
        stdout.write_all(b"...\n").await?;
        stdout.flush().await?;
        if let Some(answer) = session.respond().await {
            stdout.write_all(format!("{}\n", answer.text).as_bytes()).await?;
        }
    }
    Ok(())
}
