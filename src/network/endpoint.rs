//! Endpoint Selection and Client Configuration
//!
//! The single environment-dependent setting: connect to the local
//! development server when the host resolves to a loopback name,
//! otherwise to the fixed production endpoint.

use std::time::Duration;

/// Development server endpoint.
pub const LOCAL_ENDPOINT: &str = "ws://localhost:8080";

/// Production server endpoint.
pub const PRODUCTION_ENDPOINT: &str = "wss://gridball.example.com";

/// Pick the server endpoint for a hostname.
pub fn select_endpoint(hostname: &str) -> &'static str {
    match hostname {
        "localhost" | "127.0.0.1" | "::1" => LOCAL_ENDPOINT,
        _ => PRODUCTION_ENDPOINT,
    }
}

/// Reconnect behavior after a lost channel.
///
/// Bounded exponential backoff: attempt `n` waits
/// `base_delay * 2^(n-1)`, capped at `max_delay`. Zero attempts keep the
/// channel's Closed state terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Maximum reconnect attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    /// No reconnection: a lost channel is terminal.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Backoff delay for a 1-based attempt number.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1 << exponent);
        delay.min(self.max_delay)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint to connect to.
    pub endpoint: String,
    /// Reconnect behavior.
    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    /// Configuration for the environment named by `hostname`.
    pub fn for_host(hostname: &str) -> Self {
        Self {
            endpoint: select_endpoint(hostname).to_owned(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: PRODUCTION_ENDPOINT.to_owned(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}
