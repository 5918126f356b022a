//! Connection settings for the gateway.

use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8010/api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of an endpoint below the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
