//! Helpers shared by the provider normalizers.

use crate::error::{LookupError, Result};
use crate::provider::NOT_INFORMED;
use cadastro_core::digits_only;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decode a provider body into its typed response.
///
/// # Errors
/// Returns `LookupError::Parse` tagged with the provider name.
pub fn decode<T: DeserializeOwned>(provider: &str, body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| LookupError::Parse {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}

/// Use the value when present and not blank, otherwise [`NOT_INFORMED`].
#[must_use]
pub fn or_not_informed(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| NOT_INFORMED.to_string())
}

/// Drop blank strings.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Digits-only postal code, or [`NOT_INFORMED`] when the source has none.
#[must_use]
pub fn canonical_postal_code(value: Option<String>) -> String {
    let digits = value.as_deref().map(digits_only).unwrap_or_default();
    if digits.is_empty() {
        NOT_INFORMED.to_string()
    } else {
        digits
    }
}

/// Join a base URL and a path without doubling the slash.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Accept a JSON string or number as an optional string.
///
/// Some providers send the area code as a number.
pub fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
