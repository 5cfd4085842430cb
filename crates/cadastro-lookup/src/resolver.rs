//! Postal-code resolution with provider fallback.
//!
//! Providers are tried strictly in order, one attempt at a time. Each
//! provider gets `max_attempts` tries with a linearly growing pause between
//! them before the resolver moves on to the next one.

use crate::cache::AddressCache;
use crate::error::{LookupError, Result};
use crate::fetcher::{HttpFetcher, ReqwestFetcher};
use crate::outcome::{LookupFailure, LookupOutcome, ProviderFailure, CACHE_SOURCE};
use crate::provider::{AddressProvider, AddressRecord};
use crate::providers;
use cadastro_core::{digits_only, LookupConfig};
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to each provider request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts per provider, including the first one.
pub const MAX_ATTEMPTS: u32 = 3;

/// Pause after the first failed attempt; later pauses are multiples of it.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Timeout for the connectivity probe.
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connectivity probe endpoint.
pub const CONNECTIVITY_URL: &str = "https://httpbin.org/get";

/// Per-provider retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per provider, at least 1
    pub max_attempts: u32,
    /// Base delay; the pause after attempt `n` is `n * base_delay`
    pub base_delay: Duration,
    /// Timeout for each request
    pub request_timeout: Duration,
}

impl RetryPolicy {
    /// Pause to take after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: RETRY_DELAY,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Resolves postal codes to addresses through an ordered list of providers.
///
/// Successful lookups are cached by digits-only postal code.
pub struct AddressResolver {
    providers: Vec<Arc<dyn AddressProvider>>,
    fetcher: Arc<dyn HttpFetcher>,
    cache: AddressCache,
    policy: RetryPolicy,
    connectivity_url: String,
    connectivity_timeout: Duration,
}

impl AddressResolver {
    /// Create a resolver with no providers and default settings.
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            providers: Vec::new(),
            fetcher,
            cache: AddressCache::default(),
            policy: RetryPolicy::default(),
            connectivity_url: CONNECTIVITY_URL.to_string(),
            connectivity_timeout: CONNECTIVITY_TIMEOUT,
        }
    }

    /// Create a resolver with ViaCEP, BrasilAPI and APICEP, in that order.
    #[must_use]
    pub fn with_default_providers(fetcher: Arc<dyn HttpFetcher>) -> Self {
        let mut resolver = Self::new(fetcher);
        resolver.providers = providers::default_providers();
        resolver
    }

    /// Build a `reqwest`-backed resolver from configuration.
    ///
    /// # Errors
    /// Returns error if a configured provider name is unknown or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new()?);
        let mut resolver = Self::new(fetcher)
            .with_policy(RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: config.retry_delay(),
                request_timeout: config.request_timeout(),
            })
            .with_cache_ttl(config.cache_ttl())
            .with_connectivity_probe(&config.connectivity_url, config.connectivity_timeout());

        for name in &config.providers {
            resolver.add_provider(providers::by_name(name)?);
        }

        Ok(resolver)
    }

    /// Append a provider at the lowest priority.
    pub fn add_provider(&mut self, provider: Arc<dyn AddressProvider>) {
        self.providers.push(provider);
    }

    /// Replace the retry policy. `max_attempts` below 1 is raised to 1.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = RetryPolicy {
            max_attempts: policy.max_attempts.max(1),
            ..policy
        };
        self
    }

    /// Replace the cache with an empty one using the given TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = AddressCache::new(ttl);
        self
    }

    /// Set the connectivity probe endpoint and timeout.
    #[must_use]
    pub fn with_connectivity_probe(mut self, url: impl Into<String>, timeout: Duration) -> Self {
        self.connectivity_url = url.into();
        self.connectivity_timeout = timeout;
        self
    }

    /// Current retry policy.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The cache backing [`resolve`](Self::resolve).
    #[must_use]
    pub fn cache(&self) -> &AddressCache {
        &self.cache
    }

    /// Drop every cached address.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Provider names in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve a postal code, consulting the cache first.
    ///
    /// Non-digit characters are ignored. A fresh cache entry is returned with
    /// source [`CACHE_SOURCE`] without touching the network; otherwise the
    /// providers are queried and a success is cached.
    pub async fn resolve(&self, identifier: &str) -> LookupOutcome {
        let key = digits_only(identifier);

        if let Some(record) = self.cache.get(&key) {
            tracing::debug!(postal_code = %key, "Serving address from cache");
            return LookupOutcome::Success {
                record,
                source: CACHE_SOURCE.to_string(),
            };
        }

        let outcome = self.query_providers(&key).await;
        if let LookupOutcome::Success { record, .. } = &outcome {
            self.cache.put(key, record.clone());
        }
        outcome
    }

    /// Resolve a postal code without reading or writing the cache.
    pub async fn resolve_uncached(&self, identifier: &str) -> LookupOutcome {
        self.query_providers(&digits_only(identifier)).await
    }

    /// Probe a well-known endpoint to tell whether the network is reachable.
    ///
    /// Advisory only: [`resolve`](Self::resolve) never consults it.
    pub async fn check_connectivity(&self) -> bool {
        match self
            .fetcher
            .get_json(&self.connectivity_url, self.connectivity_timeout)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("No connectivity: {}", e);
                false
            }
        }
    }

    async fn query_providers(&self, key: &str) -> LookupOutcome {
        tracing::debug!(postal_code = %key, "Starting provider lookup");
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match self.try_provider(provider.as_ref(), key).await {
                Ok(record) => {
                    tracing::info!(
                        provider = provider.name(),
                        postal_code = %key,
                        "Address resolved"
                    );
                    return LookupOutcome::Success {
                        record,
                        source: provider.name().to_string(),
                    };
                }
                Err(failure) => failures.push(failure),
            }
        }

        tracing::warn!(postal_code = %key, "All providers failed");
        LookupOutcome::Failure(LookupFailure::exhausted(failures))
    }

    async fn try_provider(
        &self,
        provider: &dyn AddressProvider,
        key: &str,
    ) -> std::result::Result<AddressRecord, ProviderFailure> {
        let url = provider.request_url(key);
        let max_attempts = self.policy.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(provider, &url).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}",
                        provider.name(),
                        attempt,
                        max_attempts,
                        e
                    );
                    last_error = Some(e);

                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        Err(ProviderFailure {
            provider: provider.name().to_string(),
            attempts: max_attempts,
            error: last_error
                .unwrap_or_else(|| LookupError::Internal("no attempt was made".to_string())),
        })
    }

    async fn attempt(&self, provider: &dyn AddressProvider, url: &str) -> Result<AddressRecord> {
        let body = self
            .fetcher
            .get_json(url, self.policy.request_timeout)
            .await
            .map_err(|e| match e {
                LookupError::Parse { message, .. } => LookupError::Parse {
                    provider: provider.name().to_string(),
                    message,
                },
                other => other,
            })?;

        if provider.is_not_found(&body) {
            return Err(LookupError::NotFound {
                provider: provider.name().to_string(),
            });
        }

        provider.normalize(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OfflineFetcher;

    #[async_trait]
    impl HttpFetcher for OfflineFetcher {
        async fn get_json(&self, _url: &str, _timeout: Duration) -> Result<serde_json::Value> {
            Err(LookupError::Network("offline".to_string()))
        }
    }

    #[test]
    fn test_retry_constants() {
        const _: () = assert!(MAX_ATTEMPTS == 3);
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(10));
        assert_eq!(CONNECTIVITY_TIMEOUT, Duration::from_secs(5));
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
    }

    #[test]
    fn test_policy_clamps_attempts() {
        let resolver = AddressResolver::new(Arc::new(OfflineFetcher)).with_policy(RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        });
        assert_eq!(resolver.policy().max_attempts, 1);
    }

    #[test]
    fn test_default_provider_names() {
        let resolver = AddressResolver::with_default_providers(Arc::new(OfflineFetcher));
        assert_eq!(resolver.provider_names(), vec!["ViaCEP", "BrasilAPI", "APICEP"]);
    }

    #[test]
    fn test_from_config_rejects_unknown_provider() {
        let config = LookupConfig {
            providers: vec!["viacep".to_string(), "postmon".to_string()],
            ..LookupConfig::default()
        };
        let err = AddressResolver::from_config(&config)
            .err()
            .expect("unknown provider must fail");
        assert!(matches!(err, LookupError::UnknownProvider { ref name } if name == "postmon"));
    }

    #[test]
    fn test_from_config_respects_order() {
        let config = LookupConfig {
            providers: vec!["apicep".to_string(), "viacep".to_string()],
            max_attempts: 2,
            ..LookupConfig::default()
        };
        let resolver = AddressResolver::from_config(&config).expect("valid config");
        assert_eq!(resolver.provider_names(), vec!["APICEP", "ViaCEP"]);
        assert_eq!(resolver.policy().max_attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_providers_fails_without_panicking() {
        let resolver = AddressResolver::new(Arc::new(OfflineFetcher));
        let outcome = resolver.resolve("01310-100").await;
        let failure = outcome.failure().expect("failure");
        assert_eq!(failure.reason, "all providers unavailable");
        assert!(failure.details.is_empty());
    }

    #[tokio::test]
    async fn test_connectivity_false_when_offline() {
        let resolver = AddressResolver::new(Arc::new(OfflineFetcher));
        assert!(!resolver.check_connectivity().await);
    }
}
