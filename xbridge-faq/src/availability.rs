//! Agent availability policies.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::agent::AgentService;

/// Default refresh interval for [`AvailabilityPolicy::HealthChecked`].
pub const DEFAULT_HEALTH_TTL: Duration = Duration::from_secs(60);

/// How the router decides whether the agent may be called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityPolicy {
    /// Always treat the agent as available.
    AssumeAvailable,
    /// Ask `/health`, caching the answer for `ttl`.
    HealthChecked { ttl: Duration },
    /// Never call the agent.
    Disabled,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        AvailabilityPolicy::HealthChecked {
            ttl: DEFAULT_HEALTH_TTL,
        }
    }
}

impl FromStr for AvailabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "assume" => Ok(AvailabilityPolicy::AssumeAvailable),
            "health" => Ok(AvailabilityPolicy::default()),
            "disabled" | "never" | "off" => Ok(AvailabilityPolicy::Disabled),
            other => Err(format!(
                "unknown availability policy {:?}, expected health, always or disabled",
                other
            )),
        }
    }
}

impl fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityPolicy::AssumeAvailable => f.write_str("always"),
            AvailabilityPolicy::HealthChecked { ttl } => write!(f, "health (ttl {}s)", ttl.as_secs()),
            AvailabilityPolicy::Disabled => f.write_str("disabled"),
        }
    }
}

/// Availability capability injected into the router.
pub struct Availability {
    policy: AvailabilityPolicy,
    cached: Mutex<Option<(Instant, bool)>>,
}

impl Availability {
    pub fn new(policy: AvailabilityPolicy) -> Self {
        Self {
            policy,
            cached: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        self.policy
    }

    /// Whether the agent may be called right now.
    pub async fn is_available(&self, agent: &dyn AgentService) -> bool {
        let ttl = match self.policy {
            AvailabilityPolicy::AssumeAvailable => return true,
            AvailabilityPolicy::Disabled => return false,
            AvailabilityPolicy::HealthChecked { ttl } => ttl,
        };

        // Held across the probe so concurrent callers share one health call.
        let mut cached = self.cached.lock().await;
        if let Some((checked_at, available)) = *cached {
            if checked_at.elapsed() < ttl {
                return available;
            }
        }

        let available = match agent.health().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("agent health check failed: {}", e);
                false
            }
        };
        debug!(available, "agent health refreshed");
        *cached = Some((Instant::now(), available));
        available
    }

    /// Drop the cached health result.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}
