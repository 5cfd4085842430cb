//! Address provider trait and the normalized address record.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Placeholder stored in address fields the provider did not supply.
pub const NOT_INFORMED: &str = "Not informed";

/// Trait describing one remote postal-code lookup service.
///
/// A provider performs no I/O itself: the resolver fetches the URL it builds
/// and hands the parsed JSON body back for classification and normalization.
/// Implementations should be thread-safe (Send + Sync) for use in async contexts.
pub trait AddressProvider: Send + Sync {
    /// Unique, human-readable provider name reported as the result source.
    fn name(&self) -> &str;

    /// Build the request URL for a digits-only postal code.
    fn request_url(&self, postal_code: &str) -> String;

    /// Detect a "not found" answer delivered with a success status.
    fn is_not_found(&self, body: &serde_json::Value) -> bool;

    /// Map the provider's response schema onto [`AddressRecord`].
    ///
    /// # Errors
    /// Returns `LookupError::Parse` if the body does not match the schema.
    fn normalize(&self, body: serde_json::Value) -> Result<AddressRecord>;
}

/// Canonical address shape shared by every provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Postal code, digits only
    pub postal_code: String,
    /// Street name
    pub street: String,
    /// Neighborhood (bairro)
    pub neighborhood: String,
    /// City
    pub city: String,
    /// State abbreviation
    pub state: String,
    /// Address complement, when the source has one
    pub complement: Option<String>,
    /// Telephone area code (DDD), when the source has one
    pub area_code: Option<String>,
}

impl AddressRecord {
    /// Record with every required field set to [`NOT_INFORMED`].
    #[must_use]
    pub fn not_informed() -> Self {
        Self {
            postal_code: NOT_INFORMED.to_string(),
            street: NOT_INFORMED.to_string(),
            neighborhood: NOT_INFORMED.to_string(),
            city: NOT_INFORMED.to_string(),
            state: NOT_INFORMED.to_string(),
            complement: None,
            area_code: None,
        }
    }

    /// Single-line rendering: `street, neighborhood - city/state`.
    #[must_use]
    pub fn one_line(&self) -> String {
        let mut line = format!(
            "{}, {} - {}/{}",
            self.street, self.neighborhood, self.city, self.state
        );
        if let Some(complement) = &self.complement {
            line.push_str(" (");
            line.push_str(complement);
            line.push(')');
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_informed_defaults() {
        let record = AddressRecord::not_informed();
        assert_eq!(record.street, NOT_INFORMED);
        assert_eq!(record.state, NOT_INFORMED);
        assert!(record.complement.is_none());
        assert!(record.area_code.is_none());
    }

    #[test]
    fn test_one_line() {
        let mut record = AddressRecord {
            postal_code: "01310100".to_string(),
            street: "Avenida Paulista".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            complement: None,
            area_code: Some("11".to_string()),
        };
        assert_eq!(
            record.one_line(),
            "Avenida Paulista, Bela Vista - São Paulo/SP"
        );

        record.complement = Some("até 610 - lado par".to_string());
        assert!(record.one_line().ends_with("(até 610 - lado par)"));
    }

    #[test]
    fn test_record_serialization() {
        let record = AddressRecord::not_informed();
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["city"], NOT_INFORMED);
        assert!(json["complement"].is_null());
    }
}
