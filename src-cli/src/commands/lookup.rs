//! Postal-code lookup commands.

use crate::error::CommandError;
use cadastro_core::PostalCode;
use cadastro_lookup::{AddressRecord, AddressResolver, FailureKind, LookupOutcome};
use serde::Serialize;
use std::fmt;

/// Result of looking up one postal code.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    /// Postal code as typed
    pub query: String,
    /// Provider name, or "Cache Local"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Normalized address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AddressRecord>,
    /// Why nothing was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl LookupReport {
    fn failed(query: &str, error: CommandError) -> Self {
        Self {
            query: query.to_string(),
            source: None,
            record: None,
            error: Some(error),
        }
    }

    /// Whether an address was found.
    pub fn is_success(&self) -> bool {
        self.record.is_some()
    }
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.record, &self.source, &self.error) {
            (Some(record), Some(source), _) => {
                write!(f, "{}: {} [{}]", self.query, record.one_line(), source)
            }
            (_, _, Some(error)) => write!(f, "{}: {}", self.query, error),
            _ => write!(f, "{}: no result", self.query),
        }
    }
}

/// Look up one postal code.
///
/// Malformed input is rejected before any request is made. On failure the
/// connectivity probe runs only when it can change the message.
pub async fn lookup(resolver: &AddressResolver, query: &str, use_cache: bool) -> LookupReport {
    let postal_code = match PostalCode::new(query) {
        Ok(postal_code) => postal_code,
        Err(e) => {
            let error = CommandError::new("INVALID_POSTAL_CODE", e.to_string());
            return LookupReport::failed(query, error);
        }
    };

    let outcome = if use_cache {
        resolver.resolve(postal_code.as_str()).await
    } else {
        resolver.resolve_uncached(postal_code.as_str()).await
    };

    match outcome {
        LookupOutcome::Success { record, source } => LookupReport {
            query: query.to_string(),
            source: Some(source),
            record: Some(record),
            error: None,
        },
        LookupOutcome::Failure(failure) => {
            let connected = match failure.kind() {
                FailureKind::Network | FailureKind::Exhausted => {
                    resolver.check_connectivity().await
                }
                FailureKind::Timeout | FailureKind::NotFound => true,
            };
            LookupReport::failed(query, CommandError::from_lookup_failure(&failure, connected))
        }
    }
}

/// Look up several postal codes one after another, sharing the cache.
pub async fn lookup_all(
    resolver: &AddressResolver,
    queries: &[String],
    use_cache: bool,
) -> Vec<LookupReport> {
    let mut reports = Vec::with_capacity(queries.len());
    for query in queries {
        reports.push(lookup(resolver, query, use_cache).await);
    }
    reports
}

/// Provider position and name.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderEntry {
    /// 1-based priority
    pub priority: usize,
    /// Provider name
    pub name: String,
}

impl fmt::Display for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.priority, self.name)
    }
}

/// Configured providers in priority order.
pub fn providers(resolver: &AddressResolver) -> Vec<ProviderEntry> {
    resolver
        .provider_names()
        .into_iter()
        .enumerate()
        .map(|(i, name)| ProviderEntry {
            priority: i + 1,
            name: name.to_string(),
        })
        .collect()
}

/// Connectivity probe result.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    /// Whether the probe endpoint answered
    pub connected: bool,
}

impl fmt::Display for ConnectivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.connected {
            f.write_str("online")
        } else {
            f.write_str("offline")
        }
    }
}

/// Run the connectivity probe.
pub async fn check(resolver: &AddressResolver) -> ConnectivityReport {
    ConnectivityReport {
        connected: resolver.check_connectivity().await,
    }
}
