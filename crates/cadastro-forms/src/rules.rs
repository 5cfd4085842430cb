//! Field validators.
//!
//! Every validator is total: it returns a [`ValidationResult`] for any input
//! and never panics. Validators that depend on the current date have an
//! `_on` variant taking `today` explicitly.

use crate::age::{has_date_shape, oldest_birth_date, parse_birth_date, today};
use cadastro_core::digits_only;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters counted as "special" by the password rule.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email regex is hardcoded and valid")
});

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the value is acceptable
    pub valid: bool,
    /// Why it is not, when invalid
    pub message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A failing result with a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Validate a CPF: 11 digits, not all equal, both check digits correct.
#[must_use]
pub fn validate_national_id(value: &str) -> ValidationResult {
    let digits: Vec<u32> = digits_only(value)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return ValidationResult::error("National ID must have 11 digits");
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return ValidationResult::error("Invalid national ID");
    }
    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return ValidationResult::error("Invalid national ID");
    }

    ValidationResult::ok()
}

/// Weighted mod-11 check digit over `digits`, weights counting down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits.iter().rev().zip(2..).map(|(d, w)| d * w).sum();

    match sum % 11 {
        0 | 1 => 0,
        rem => 11 - rem,
    }
}

/// Validate a full name: at least a first and a last name.
#[must_use]
pub fn validate_full_name(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::error("Name is required");
    }
    if value.split_whitespace().count() < 2 {
        return ValidationResult::error("Enter first and last name");
    }
    ValidationResult::ok()
}

/// Validate a `DD/MM/YYYY` birth date against `today`.
#[must_use]
pub fn validate_birth_date_on(value: &str, today: NaiveDate) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::error("Birth date is required");
    }
    if !has_date_shape(value) {
        return ValidationResult::error("Use the DD/MM/YYYY format");
    }

    let Some(birth) = parse_birth_date(value) else {
        return ValidationResult::error("Invalid date");
    };

    if birth > today {
        return ValidationResult::error("Date cannot be in the future");
    }
    if birth < oldest_birth_date(today) {
        return ValidationResult::error("Date is too far in the past");
    }

    ValidationResult::ok()
}

/// [`validate_birth_date_on`] evaluated against the local date.
#[must_use]
pub fn validate_birth_date(value: &str) -> ValidationResult {
    validate_birth_date_on(value, today())
}

fn valid_area_code(digits: &str) -> bool {
    digits
        .get(..2)
        .and_then(|ddd| ddd.parse::<u32>().ok())
        .is_some_and(|ddd| (11..=99).contains(&ddd))
}

/// Validate a landline: area code plus 8 digits.
#[must_use]
pub fn validate_fixed_phone(value: &str) -> ValidationResult {
    let digits = digits_only(value);
    if digits.is_empty() {
        return ValidationResult::error("Phone is required");
    }
    if digits.len() != 10 {
        return ValidationResult::error("Phone must have 10 digits (area code + number)");
    }
    if !valid_area_code(&digits) {
        return ValidationResult::error("Invalid area code");
    }
    ValidationResult::ok()
}

/// Validate a mobile number: area code plus 9 digits starting with `9`.
#[must_use]
pub fn validate_mobile_phone(value: &str) -> ValidationResult {
    let digits = digits_only(value);
    if digits.is_empty() {
        return ValidationResult::error("Mobile phone is required");
    }
    if digits.len() != 11 {
        return ValidationResult::error("Mobile phone must have 11 digits (area code + number)");
    }
    if !valid_area_code(&digits) {
        return ValidationResult::error("Invalid area code");
    }
    if digits.as_bytes()[2] != b'9' {
        return ValidationResult::error("Mobile phone must start with 9 after the area code");
    }
    ValidationResult::ok()
}

/// Validate a CEP: exactly 8 digits once separators are removed.
#[must_use]
pub fn validate_postal_code(value: &str) -> ValidationResult {
    let digits = digits_only(value);
    if digits.is_empty() {
        return ValidationResult::error("Postal code is required");
    }
    if digits.len() != 8 {
        return ValidationResult::error("Postal code must have 8 digits");
    }
    ValidationResult::ok()
}

/// Validate an email address shape.
#[must_use]
pub fn validate_email(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::error("Email is required");
    }
    if !EMAIL_PATTERN.is_match(value) {
        return ValidationResult::error("Invalid email");
    }
    ValidationResult::ok()
}

/// Validate password strength.
///
/// At least [`MIN_PASSWORD_LEN`] characters and three of the four classes:
/// uppercase, lowercase, digit, one of [`PASSWORD_SPECIALS`].
#[must_use]
pub fn validate_password(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::error("Password is required");
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return ValidationResult::error(format!(
            "Password must have at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    let classes = [
        value.chars().any(|c| c.is_ascii_uppercase()),
        value.chars().any(|c| c.is_ascii_lowercase()),
        value.chars().any(|c| c.is_ascii_digit()),
        value.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
    ];
    if classes.iter().filter(|&&present| present).count() < 3 {
        return ValidationResult::error(
            "Password must contain at least 3 of: uppercase letter, lowercase letter, number, special character",
        );
    }

    ValidationResult::ok()
}

/// Validate that `confirmation` is present and matches `password`.
#[must_use]
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    if confirmation.is_empty() {
        return ValidationResult::error("Password confirmation is required");
    }
    if password != confirmation {
        return ValidationResult::error("Passwords do not match");
    }
    ValidationResult::ok()
}

/// Validate that a field is not blank. `label` names the field in the message.
#[must_use]
pub fn validate_required(value: &str, label: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::error(format!("{label} is required"));
    }
    ValidationResult::ok()
}
