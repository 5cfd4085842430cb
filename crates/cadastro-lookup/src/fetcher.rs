//! HTTP transport seam used by the resolver.

use crate::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Fetches a URL and decodes the body as JSON.
///
/// The resolver only talks to providers through this trait, so tests can
/// script responses without a network.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET `url` and parse the body as JSON.
    ///
    /// # Errors
    /// - `LookupError::Timeout` when `timeout` elapses
    /// - `LookupError::Http` on a non-success status
    /// - `LookupError::Network` on transport failures
    /// - `LookupError::Parse` when the body is not JSON
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<serde_json::Value>;
}

/// `reqwest`-backed fetcher.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cadastro/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn map_error(error: &reqwest::Error, timeout: Duration) -> LookupError {
        if error.is_timeout() {
            LookupError::Timeout {
                seconds: timeout.as_secs(),
            }
        } else {
            LookupError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<serde_json::Value> {
        tracing::debug!(url, timeout_ms = timeout.as_millis(), "GET");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        serde_json::from_slice(&body).map_err(|e| LookupError::Parse {
            provider: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(ReqwestFetcher::new().is_ok());
    }

    #[test]
    fn test_with_client() {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("build client");
        let _fetcher = ReqwestFetcher::with_client(client);
    }
}
