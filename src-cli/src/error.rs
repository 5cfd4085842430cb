//! Serializable error reported by CLI commands.

use cadastro_lookup::{FailureKind, LookupFailure};
use serde::Serialize;
use std::fmt;

/// Error attached to a command report, printed as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandError {
    /// Stable error code for scripting (e.g., "POSTAL_CODE_NOT_FOUND")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// Map a lookup failure to a user-facing error.
    ///
    /// `connected` is the result of the connectivity probe; it only changes
    /// the message when the failure was not a timeout or a clean "not found".
    pub fn from_lookup_failure(failure: &LookupFailure, connected: bool) -> Self {
        let code = match failure.kind() {
            FailureKind::Timeout => "LOOKUP_TIMEOUT",
            FailureKind::NotFound => "POSTAL_CODE_NOT_FOUND",
            FailureKind::Network | FailureKind::Exhausted if !connected => "NO_CONNECTION",
            FailureKind::Network | FailureKind::Exhausted => "PROVIDERS_UNAVAILABLE",
        };

        let errors: serde_json::Map<String, serde_json::Value> = failure
            .attempts
            .iter()
            .map(|a| (a.provider.clone(), serde_json::Value::String(a.error.to_string())))
            .collect();

        Self::with_details(
            code,
            failure.user_message(connected),
            serde_json::json!({
                "reason": failure.reason,
                "providers": failure.details,
                "errors": errors,
            }),
        )
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadastro_lookup::{LookupError, ProviderFailure};

    fn failure(errors: Vec<(&str, LookupError)>) -> LookupFailure {
        LookupFailure::exhausted(
            errors
                .into_iter()
                .map(|(provider, error)| ProviderFailure {
                    provider: provider.to_string(),
                    attempts: 3,
                    error,
                })
                .collect(),
        )
    }

    #[test]
    fn test_timeout_code() {
        let err = CommandError::from_lookup_failure(
            &failure(vec![("ViaCEP", LookupError::Timeout { seconds: 10 })]),
            false,
        );
        assert_eq!(err.code, "LOOKUP_TIMEOUT");
    }

    #[test]
    fn test_connectivity_changes_network_code() {
        let f = failure(vec![
            ("ViaCEP", LookupError::Network("dns error".to_string())),
            ("BrasilAPI", LookupError::Http { status: 502 }),
        ]);

        assert_eq!(CommandError::from_lookup_failure(&f, false).code, "NO_CONNECTION");
        let online = CommandError::from_lookup_failure(&f, true);
        assert_eq!(online.code, "PROVIDERS_UNAVAILABLE");

        let details = online.details.expect("details");
        assert_eq!(details["providers"], serde_json::json!(["ViaCEP", "BrasilAPI"]));
        assert_eq!(details["errors"]["BrasilAPI"], "HTTP error: status 502");
    }

    #[test]
    fn test_not_found_code() {
        let err = CommandError::from_lookup_failure(
            &failure(vec![(
                "ViaCEP",
                LookupError::NotFound {
                    provider: "ViaCEP".to_string(),
                },
            )]),
            true,
        );
        assert_eq!(err.code, "POSTAL_CODE_NOT_FOUND");
        assert_eq!(err.to_string(), "Postal code not found. (POSTAL_CODE_NOT_FOUND)");
    }
}
