//! Shared types used across the cadastro toolkit.
//!
//! This module defines common newtypes and helpers that provide type safety
//! and clear domain modeling.

use crate::error::CadastroError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static CEP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}$").expect("postal code regex is hardcoded and valid"));

/// Strip every character that is not an ASCII digit.
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Newtype for Brazilian postal codes (CEP) with validation.
///
/// Stored without separators: `"01310-100"` becomes `"01310100"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostalCode(String);

impl PostalCode {
    /// Create a new `PostalCode` from free-form input.
    ///
    /// # Errors
    /// Returns error if the input does not contain exactly 8 digits.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CadastroError> {
        let cleaned = digits_only(value.as_ref());
        Self::validate(&cleaned)?;
        Ok(Self(cleaned))
    }

    /// Get the digits-only value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format as `XXXXX-XXX`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }

    fn validate(cleaned: &str) -> Result<(), CadastroError> {
        if CEP_REGEX.is_match(cleaned) {
            Ok(())
        } else {
            Err(CadastroError::Validation(format!(
                "invalid postal code: expected 8 digits, got {}",
                cleaned.len()
            )))
        }
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}
