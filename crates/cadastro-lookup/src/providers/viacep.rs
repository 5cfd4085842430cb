//! ViaCEP provider (`viacep.com.br`).

use super::common::{
    canonical_postal_code, decode, join_url, lenient_string, non_blank, or_not_informed,
};
use crate::error::Result;
use crate::provider::{AddressProvider, AddressRecord};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// ViaCEP lookup service. First in the default priority order.
///
/// Unknown postal codes come back as HTTP 200 with `{"erro": true}`.
pub struct ViaCepProvider {
    base_url: String,
}

impl ViaCepProvider {
    /// Create a provider pointing at the public ViaCEP API.
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

impl Default for ViaCepProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressProvider for ViaCepProvider {
    fn name(&self) -> &str {
        "ViaCEP"
    }

    fn request_url(&self, postal_code: &str) -> String {
        join_url(&self.base_url, &format!("ws/{postal_code}/json/"))
    }

    fn is_not_found(&self, body: &serde_json::Value) -> bool {
        // Older deployments send a bool, newer ones the string "true"
        match body.get("erro") {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }

    fn normalize(&self, body: serde_json::Value) -> Result<AddressRecord> {
        let data: ViaCepResponse = decode(self.name(), body)?;

        Ok(AddressRecord {
            postal_code: canonical_postal_code(data.cep),
            street: or_not_informed(data.logradouro),
            neighborhood: or_not_informed(data.bairro),
            city: or_not_informed(data.localidade),
            state: or_not_informed(data.uf),
            complement: non_blank(data.complemento),
            area_code: non_blank(data.ddd),
        })
    }
}

// ViaCEP API types

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    cep: Option<String>,
    logradouro: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    ddd: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NOT_INFORMED;
    use serde_json::json;

    #[test]
    fn test_request_url() {
        let provider = ViaCepProvider::new();
        assert_eq!(
            provider.request_url("01310100"),
            "https://viacep.com.br/ws/01310100/json/"
        );

        let provider = ViaCepProvider::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(
            provider.request_url("01310100"),
            "http://127.0.0.1:1234/ws/01310100/json/"
        );
    }

    #[test]
    fn test_not_found_flag() {
        let provider = ViaCepProvider::new();
        assert!(provider.is_not_found(&json!({ "erro": true })));
        assert!(provider.is_not_found(&json!({ "erro": "true" })));
        assert!(!provider.is_not_found(&json!({ "erro": false })));
        assert!(!provider.is_not_found(&json!({ "cep": "01310-100" })));
    }

    #[test]
    fn test_normalize_full_response() {
        let provider = ViaCepProvider::new();
        let body = json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308",
            "ddd": "11"
        });

        let record = provider.normalize(body).expect("normalize ViaCEP body");
        assert_eq!(record.postal_code, "01310100");
        assert_eq!(record.street, "Avenida Paulista");
        assert_eq!(record.neighborhood, "Bela Vista");
        assert_eq!(record.city, "São Paulo");
        assert_eq!(record.state, "SP");
        assert_eq!(record.complement.as_deref(), Some("de 612 a 1510 - lado par"));
        assert_eq!(record.area_code.as_deref(), Some("11"));
    }

    #[test]
    fn test_normalize_sparse_response() {
        // Small towns often have a single CEP with no street data
        let provider = ViaCepProvider::new();
        let body = json!({
            "cep": "78175-000",
            "logradouro": "",
            "complemento": "",
            "bairro": "",
            "localidade": "Poconé",
            "uf": "MT"
        });

        let record = provider.normalize(body).expect("normalize sparse body");
        assert_eq!(record.street, NOT_INFORMED);
        assert_eq!(record.neighborhood, NOT_INFORMED);
        assert_eq!(record.city, "Poconé");
        assert!(record.complement.is_none());
        assert!(record.area_code.is_none());
    }
}
