//! Lookup results returned across the resolver boundary.

use crate::error::LookupError;
use crate::provider::AddressRecord;
use serde::{Deserialize, Serialize};

/// Source name reported for answers served from the cache.
pub const CACHE_SOURCE: &str = "Cache Local";

/// Result of resolving a postal code. Always a value, never an error.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    /// A provider (or the cache) returned an address
    Success {
        /// Normalized address
        record: AddressRecord,
        /// Provider name, or [`CACHE_SOURCE`]
        source: String,
    },
    /// No provider produced an address
    Failure(LookupFailure),
}

impl LookupOutcome {
    /// Whether the lookup produced an address.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The address, if found.
    #[must_use]
    pub fn record(&self) -> Option<&AddressRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure(_) => None,
        }
    }

    /// Where the address came from, if found.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Success { source, .. } => Some(source),
            Self::Failure(_) => None,
        }
    }

    /// The failure, if nothing was found.
    #[must_use]
    pub fn failure(&self) -> Option<&LookupFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

/// Last error observed for one provider after its retries ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Provider name
    pub provider: String,
    /// Attempts made, including the first
    pub attempts: u32,
    /// Error from the final attempt
    pub error: LookupError,
}

/// Summary of why a lookup failed, for choosing a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every provider timed out
    Timeout,
    /// Every provider failed at the transport or HTTP level
    Network,
    /// Every provider answered that the postal code does not exist
    NotFound,
    /// Mixed or other failures across providers
    Exhausted,
}

/// Every provider was tried and none produced an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    /// Human-readable reason, `"all providers unavailable"`
    pub reason: String,
    /// Provider names in the order they were tried
    pub details: Vec<String>,
    /// Per-provider final errors, same order as `details`
    pub attempts: Vec<ProviderFailure>,
}

impl LookupFailure {
    /// Build the exhaustion failure from the per-provider results.
    #[must_use]
    pub fn exhausted(attempts: Vec<ProviderFailure>) -> Self {
        let details: Vec<String> = attempts.iter().map(|a| a.provider.clone()).collect();
        let error = LookupError::AllProvidersExhausted {
            attempted: details.clone(),
        };

        Self {
            reason: error.to_string(),
            details,
            attempts,
        }
    }

    /// Classify the failure from the providers' final errors.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        let all = |pred: fn(&LookupError) -> bool| {
            !self.attempts.is_empty() && self.attempts.iter().all(|a| pred(&a.error))
        };

        if all(LookupError::is_timeout) {
            FailureKind::Timeout
        } else if all(LookupError::is_not_found) {
            FailureKind::NotFound
        } else if all(LookupError::is_network) {
            FailureKind::Network
        } else {
            FailureKind::Exhausted
        }
    }

    /// Message suitable for showing to the person who typed the postal code.
    ///
    /// `connected` is the result of the advisory connectivity probe.
    #[must_use]
    pub fn user_message(&self, connected: bool) -> &'static str {
        match self.kind() {
            FailureKind::Timeout => "The lookup is taking too long. Check your connection.",
            FailureKind::NotFound => "Postal code not found.",
            _ if !connected => "No internet connection and the postal code is not cached.",
            FailureKind::Network | FailureKind::Exhausted => {
                "Postal code services are temporarily unavailable. Try again in a few minutes."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(provider: &str, error: LookupError) -> ProviderFailure {
        ProviderFailure {
            provider: provider.to_string(),
            attempts: 3,
            error,
        }
    }

    fn not_found(provider: &str) -> ProviderFailure {
        failed(
            provider,
            LookupError::NotFound {
                provider: provider.to_string(),
            },
        )
    }

    #[test]
    fn test_exhausted_lists_providers_in_order() {
        let failure = LookupFailure::exhausted(vec![
            not_found("ViaCEP"),
            failed("BrasilAPI", LookupError::Http { status: 503 }),
            failed("APICEP", LookupError::Timeout { seconds: 10 }),
        ]);

        assert_eq!(failure.reason, "all providers unavailable");
        assert_eq!(failure.details, vec!["ViaCEP", "BrasilAPI", "APICEP"]);
        assert_eq!(failure.kind(), FailureKind::Exhausted);
    }

    #[test]
    fn test_kind_classification() {
        let timeouts = LookupFailure::exhausted(vec![
            failed("ViaCEP", LookupError::Timeout { seconds: 10 }),
            failed("BrasilAPI", LookupError::Timeout { seconds: 10 }),
        ]);
        assert_eq!(timeouts.kind(), FailureKind::Timeout);

        let missing = LookupFailure::exhausted(vec![not_found("ViaCEP"), not_found("APICEP")]);
        assert_eq!(missing.kind(), FailureKind::NotFound);

        let network = LookupFailure::exhausted(vec![
            failed("ViaCEP", LookupError::Network("dns error".to_string())),
            failed("BrasilAPI", LookupError::Http { status: 500 }),
        ]);
        assert_eq!(network.kind(), FailureKind::Network);

        assert_eq!(LookupFailure::exhausted(Vec::new()).kind(), FailureKind::Exhausted);
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let timeout = LookupFailure::exhausted(vec![failed(
            "ViaCEP",
            LookupError::Timeout { seconds: 10 },
        )]);
        let missing = LookupFailure::exhausted(vec![not_found("ViaCEP")]);
        let network = LookupFailure::exhausted(vec![failed(
            "ViaCEP",
            LookupError::Network("connection refused".to_string()),
        )]);

        let messages = [
            timeout.user_message(true),
            missing.user_message(true),
            network.user_message(false),
            network.user_message(true),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = LookupOutcome::Success {
            record: AddressRecord::not_informed(),
            source: CACHE_SOURCE.to_string(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.source(), Some("Cache Local"));
        assert!(outcome.failure().is_none());

        let outcome = LookupOutcome::Failure(LookupFailure::exhausted(Vec::new()));
        assert!(!outcome.is_success());
        assert!(outcome.record().is_none());
    }
}
