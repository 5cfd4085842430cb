//! Postal-code provider implementations.

pub mod apicep;
pub mod brasilapi;
pub mod common;
pub mod viacep;

pub use apicep::ApiCepProvider;
pub use brasilapi::BrasilApiProvider;
pub use viacep::ViaCepProvider;

use crate::error::{LookupError, Result};
use crate::provider::AddressProvider;
use std::sync::Arc;

/// The reference providers in default priority order.
#[must_use]
pub fn default_providers() -> Vec<Arc<dyn AddressProvider>> {
    vec![
        Arc::new(ViaCepProvider::new()),
        Arc::new(BrasilApiProvider::new()),
        Arc::new(ApiCepProvider::new()),
    ]
}

/// Look up a reference provider by its configuration key (case-insensitive).
///
/// # Errors
/// Returns `LookupError::UnknownProvider` for names other than
/// `viacep`, `brasilapi` and `apicep`.
pub fn by_name(name: &str) -> Result<Arc<dyn AddressProvider>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "viacep" => Ok(Arc::new(ViaCepProvider::new())),
        "brasilapi" => Ok(Arc::new(BrasilApiProvider::new())),
        "apicep" => Ok(Arc::new(ApiCepProvider::new())),
        _ => Err(LookupError::UnknownProvider {
            name: name.to_string(),
        }),
    }
}
