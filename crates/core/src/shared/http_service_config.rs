use std::time::Duration;

use crate::shared::constants::{DEFAULT_SERVICE_TIMEOUT, DEFAULT_SERVICE_URL};

/// Connection settings for the recognition and recommendation HTTP services.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpServiceConfig {
    /// Base URL of the service API, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    /// Per-request timeout. Only a resource bound; the polling loop does not depend on it.
    pub timeout: Duration,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            timeout: DEFAULT_SERVICE_TIMEOUT,
        }
    }
}

impl HttpServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `GATEWATCH_SERVICE_URL` and `GATEWATCH_SERVICE_TIMEOUT` (seconds).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GATEWATCH_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GATEWATCH_SERVICE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
