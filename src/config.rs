//! Client configuration.
//!
//! Defaults are overridable through environment variables (read via
//! `dotenvy`, so a local `.env` file works too) and, above that, CLI flags:
//!
//! - `VSQ_ENDPOINT` - base URL of the search service
//! - `VSQ_DEBOUNCE_MS` - quiescence interval for live search
//! - `VSQ_TIMEOUT_SECS` - per-request HTTP timeout
//! - `VSQ_API_TOKEN` - optional bearer token attached to every request

use std::time::Duration;

/// Default search service endpoint (the backend's dev address).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Default quiescence interval before a typed query is searched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 280;

/// Default per-request timeout. Also bounds how long a superseded request's
/// worker thread can linger.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the search service, without a trailing slash.
    pub endpoint: String,
    /// Quiescence interval for the live-search debouncer.
    pub debounce: Duration,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Optional bearer token sent as an `Authorization` header.
    pub api_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_token: None,
        }
    }
}

impl ClientConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(url) = dotenvy::var("VSQ_ENDPOINT") {
            cfg.endpoint = url.trim_end_matches('/').to_string();
        }

        if let Ok(val) = dotenvy::var("VSQ_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.debounce = Duration::from_millis(ms);
        }

        if let Ok(val) = dotenvy::var("VSQ_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            cfg.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(token) = dotenvy::var("VSQ_API_TOKEN")
            && !token.is_empty()
        {
            cfg.api_token = Some(token);
        }

        cfg
    }

    /// Apply a CLI endpoint override on top of env/defaults.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(url) = endpoint {
            self.endpoint = url.trim_end_matches('/').to_string();
        }
        self
    }
}
