// ── HTTP transport configuration ──

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::Error;

const USER_AGENT: &str = concat!("onevo-cli/", env!("CARGO_PKG_VERSION"));

/// Transport-level knobs for the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` with the given default headers applied
    /// to every request.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(client)
    }
}
