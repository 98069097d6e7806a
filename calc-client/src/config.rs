//! Client configuration.

use std::time::Duration;

/// Environment variable holding the service base URL.
pub const BASE_URL_ENV: &str = "CALCULATOR_REST_API_V1_URL";
/// Environment variable holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "CALCULATOR_TIMEOUT_MS";

/// Calculator client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the operation paths are appended to.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Delay after which listeners see an interim processing snapshot.
    pub processing_hint: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001/v1".to_string(),
            request_timeout: Duration::from_secs(10),
            processing_hint: Some(Duration::from_millis(300)),
        }
    }
}

impl ClientConfig {
    /// Read overrides from the environment. Invalid values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) => config.request_timeout = Duration::from_millis(ms),
                Err(e) => tracing::warn!("Ignoring invalid {}={:?}: {}", TIMEOUT_ENV, raw, e),
            }
        }

        config
    }

    /// Set the service base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set or disable the interim processing notification.
    pub fn with_processing_hint(mut self, hint: Option<Duration>) -> Self {
        self.processing_hint = hint;
        self
    }
}
