//! Environment configuration for the FAQ assistant.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::agent::{AgentClientConfig, AgentTransport, DEFAULT_AGENT_TIMEOUT, DEFAULT_AGENT_URL};
use crate::availability::{AvailabilityPolicy, DEFAULT_HEALTH_TTL};
use crate::router::RouterConfig;

/// FAQ assistant configuration.
#[derive(Clone, Debug)]
pub struct FaqConfig {
    /// Agent base URL.
    pub agent_url: String,
    pub transport: AgentTransport,
    pub availability: AvailabilityPolicy,
    pub chat_enabled: bool,
    pub agent_timeout: Duration,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            agent_url: DEFAULT_AGENT_URL.to_string(),
            transport: AgentTransport::Rest,
            availability: AvailabilityPolicy::default(),
            chat_enabled: true,
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

impl FaqConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let agent_url = env::var("NEXT_PUBLIC_UAGENT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_URL.to_string());

        let transport = match env::var("FAQ_AGENT_TRANSPORT") {
            Ok(raw) => raw
                .parse::<AgentTransport>()
                .map_err(|e: String| anyhow!(e))
                .context("invalid FAQ_AGENT_TRANSPORT")?,
            Err(_) => AgentTransport::Rest,
        };

        let ttl = secs_var("FAQ_HEALTH_TTL_SECS", DEFAULT_HEALTH_TTL)?;
        let availability = match env::var("FAQ_AGENT_AVAILABILITY") {
            Ok(raw) => parse_availability(&raw, ttl)?,
            Err(_) => AvailabilityPolicy::HealthChecked { ttl },
        };

        let chat_enabled = env::var("FAQ_CHAT_ENABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let agent_timeout = secs_var("FAQ_AGENT_TIMEOUT_SECS", DEFAULT_AGENT_TIMEOUT)?;

        Ok(Self {
            agent_url,
            transport,
            availability,
            chat_enabled,
            agent_timeout,
        })
    }

    pub fn client_config(&self) -> AgentClientConfig {
        AgentClientConfig {
            base_url: self.agent_url.clone(),
            timeout: self.agent_timeout,
            transport: self.transport,
            ..Default::default()
        }
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            chat_enabled: self.chat_enabled,
            availability: self.availability,
        }
    }
}

/// Parse a policy name, applying `ttl` to the health-checked policy.
pub fn parse_availability(raw: &str, ttl: Duration) -> Result<AvailabilityPolicy> {
    let policy: AvailabilityPolicy = raw
        .parse()
        .map_err(|e: String| anyhow!(e))
        .context("invalid FAQ_AGENT_AVAILABILITY")?;
    Ok(match policy {
        AvailabilityPolicy::HealthChecked { .. } => AvailabilityPolicy::HealthChecked { ttl },
        other => other,
    })
}

fn secs_var(key: &str, default: Duration) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_secs(key, &raw),
        _ => Ok(default),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a number of seconds", key))?;
    Ok(Duration::from_secs(secs))
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_keeps_configured_ttl() {
        let ttl = Duration::from_secs(5);
        assert_eq!(
            parse_availability("health", ttl).unwrap(),
            AvailabilityPolicy::HealthChecked { ttl }
        );
        assert_eq!(
            parse_availability("always", ttl).unwrap(),
            AvailabilityPolicy::AssumeAvailable
        );
        assert!(parse_availability("maybe", ttl).is_err());
    }

    #[test]
    fn seconds_must_be_numeric() {
        assert_eq!(
            parse_secs("FAQ_HEALTH_TTL_SECS", " 30 ").unwrap(),
            Duration::from_secs(30)
        );
        let err = parse_secs("FAQ_AGENT_TIMEOUT_SECS", "ten").unwrap_err();
        assert!(err.to_string().contains("FAQ_AGENT_TIMEOUT_SECS"));
        assert!(parse_secs("FAQ_HEALTH_TTL_SECS", "-1").is_err());
    }

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
    }
}
