use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::runtime::Runtime;

/// Service address used when no override is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Environment variable that overrides the service address.
pub const API_BASE_ENV: &str = "COPILOT_API_BASE";

/// Default bound on a single request attempt, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Picks the service base URL from an optional override.
///
/// Absent, empty, or whitespace-only overrides fall back to
/// [`DEFAULT_API_BASE`]. Any other override is returned exactly as given.
pub fn resolve_endpoint(override_url: Option<&str>) -> String {
    match override_url {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// Joins a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Immutable client configuration, built once at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Resolves the configuration. An explicit `api_base` (e.g. from the
    /// command line) takes the place of the environment override.
    pub fn new<R: Runtime>(runtime: &R, api_base: Option<String>, timeout: Duration) -> Self {
        let override_url = api_base.or_else(|| runtime.env_var(API_BASE_ENV).ok());
        let base_url = resolve_endpoint(override_url.as_deref());
        debug!("Using service endpoint {}", base_url);

        Self { base_url, timeout }
    }

    /// Builds the shared reqwest client carrying the timeout and default headers.
    pub fn build_client(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .user_agent(concat!("copilot-ask/", env!("COPILOT_ASK_VERSION")))
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
