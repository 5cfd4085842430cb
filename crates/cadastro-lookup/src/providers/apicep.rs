//! APICEP provider (`cdn.apicep.com`).

use super::common::{
    canonical_postal_code, decode, join_url, lenient_string, non_blank, or_not_informed,
};
use crate::error::Result;
use crate::provider::{AddressProvider, AddressRecord};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://cdn.apicep.com";

/// APICEP static-file CDN. Last in the default priority order.
///
/// A miss is reported inside the body as `"status": 400`, or by the
/// absence of `code`.
pub struct ApiCepProvider {
    base_url: String,
}

impl ApiCepProvider {
    /// Create a provider pointing at the public APICEP CDN.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider pointing at a custom base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ApiCepProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressProvider for ApiCepProvider {
    fn name(&self) -> &str {
        "APICEP"
    }

    fn request_url(&self, postal_code: &str) -> String {
        join_url(&self.base_url, &format!("file/apicep/{postal_code}.json"))
    }

    fn is_not_found(&self, body: &serde_json::Value) -> bool {
        let status_400 = body.get("status").and_then(serde_json::Value::as_u64) == Some(400);
        let has_code = body
            .get("code")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|code| !code.is_empty());
        status_400 || !has_code
    }

    fn normalize(&self, body: serde_json::Value) -> Result<AddressRecord> {
        let data: ApiCepResponse = decode(self.name(), body)?;

        Ok(AddressRecord {
            postal_code: canonical_postal_code(data.code),
            street: or_not_informed(data.address),
            neighborhood: or_not_informed(data.district),
            city: or_not_informed(data.city),
            state: or_not_informed(data.state),
            complement: None,
            area_code: non_blank(data.ddd),
        })
    }
}

// APICEP types

#[derive(Debug, Deserialize)]
struct ApiCepResponse {
    code: Option<String>,
    state: Option<String>,
    city: Option<String>,
    district: Option<String>,
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    ddd: Option<String>,
}
