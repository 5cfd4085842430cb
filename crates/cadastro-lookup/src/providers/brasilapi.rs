//! BrasilAPI provider (`brasilapi.com.br`).

use super::common::{canonical_postal_code, decode, join_url, or_not_informed};
use crate::error::Result;
use crate::provider::{AddressProvider, AddressRecord};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br";

/// BrasilAPI CEP v1 endpoint. Second in the default priority order.
///
/// Does not report complement or area code.
pub struct BrasilApiProvider {
    base_url: String,
}

impl BrasilApiProvider {
    /// Create a provider pointing at the public BrasilAPI.
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

impl Default for BrasilApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressProvider for BrasilApiProvider {
    fn name(&self) -> &str {
        "BrasilAPI"
    }

    fn request_url(&self, postal_code: &str) -> String {
        join_url(&self.base_url, &format!("api/cep/v1/{postal_code}"))
    }

    fn is_not_found(&self, body: &serde_json::Value) -> bool {
        body.get("errors")
            .and_then(serde_json::Value::as_array)
            .is_some_and(|errors| !errors.is_empty())
    }

    fn normalize(&self, body: serde_json::Value) -> Result<AddressRecord> {
        let data: BrasilApiResponse = decode(self.name(), body)?;

        Ok(AddressRecord {
            postal_code: canonical_postal_code(data.cep),
            street: or_not_informed(data.street),
            neighborhood: or_not_informed(data.neighborhood),
            city: or_not_informed(data.city),
            state: or_not_informed(data.state),
            complement: None,
            area_code: None,
        })
    }
}

// BrasilAPI types

#[derive(Debug, Deserialize)]
struct BrasilApiResponse {
    cep: Option<String>,
    state: Option<String>,
    city: Option<String>,
    neighborhood: Option<String>,
    street: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NOT_INFORMED;
    use serde_json::json;

    #[test]
    fn test_request_url() {
        let provider = BrasilApiProvider::new();
        assert_eq!(
            provider.request_url("01310100"),
            "https://brasilapi.com.br/api/cep/v1/01310100"
        );
    }

    #[test]
    fn test_not_found_errors_array() {
        let provider = BrasilApiProvider::new();
        let body = json!({
            "message": "Todos os serviços de CEP retornaram erro.",
            "type": "service_error",
            "name": "CepPromiseError",
            "errors": [{ "name": "ServiceError", "service": "correios" }]
        });
        assert!(provider.is_not_found(&body));
        assert!(!provider.is_not_found(&json!({ "errors": [] })));
        assert!(!provider.is_not_found(&json!({ "cep": "01310100" })));
    }

    #[test]
    fn test_normalize() {
        let provider = BrasilApiProvider::new();
        let body = json!({
            "cep": "01310100",
            "state": "SP",
            "city": "São Paulo",
            "neighborhood": "Bela Vista",
            "street": "Avenida Paulista",
            "service": "open-cep"
        });

        let record = provider.normalize(body).expect("normalize BrasilAPI body");
        assert_eq!(record.postal_code, "01310100");
        assert_eq!(record.street, "Avenida Paulista");
        assert_eq!(record.state, "SP");
        assert!(record.complement.is_none());
        assert!(record.area_code.is_none());
    }

    #[test]
    fn test_normalize_missing_fields() {
        let provider = BrasilApiProvider::new();
        let record = provider
            .normalize(json!({ "cep": "69900000", "city": "Rio Branco" }))
            .expect("normalize partial body");
        assert_eq!(record.city, "Rio Branco");
        assert_eq!(record.street, NOT_INFORMED);
        assert_eq!(record.state, NOT_INFORMED);
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        let provider = BrasilApiProvider::new();
        assert!(provider.normalize(json!(["not", "an", "object"])).is_err());
    }
}
