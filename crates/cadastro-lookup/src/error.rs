//! Error types for the lookup subsystem.

use cadastro_core::CadastroError;
use thiserror::Error;

/// Errors that can occur while querying address providers.
///
/// These never cross [`AddressResolver::resolve`](crate::AddressResolver::resolve);
/// the resolver folds them into a [`LookupOutcome::Failure`](crate::LookupOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The request did not complete within the timeout
    #[error("timeout: request took longer than {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Provider answered with a non-success HTTP status
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// Connection, DNS or other transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered successfully but has no address for the postal code
    #[error("postal code not found by {provider}")]
    NotFound {
        /// Provider name
        provider: String,
    },

    /// Response body could not be decoded or normalized
    #[error("failed to parse response from {provider}: {message}")]
    Parse {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Every provider failed
    #[error("all providers unavailable")]
    AllProvidersExhausted {
        /// Provider names in the order they were tried
        attempted: Vec<String>,
    },

    /// Provider name in configuration is not known
    #[error("unknown provider: {name}")]
    UnknownProvider {
        /// Name as given in configuration
        name: String,
    },

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl LookupError {
    /// Whether the error is a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the error is a transport or HTTP status failure.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_))
    }

    /// Whether the provider reported the postal code as unknown.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<LookupError> for CadastroError {
    fn from(err: LookupError) -> Self {
        if err.is_timeout() || err.is_network() {
            Self::Network(err.to_string())
        } else {
            Self::Lookup(err.to_string())
        }
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
