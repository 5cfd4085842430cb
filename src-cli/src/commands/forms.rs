//! Masking and validation commands.

use crate::cli::ValidateKind;
use anyhow::Context;
use cadastro_forms::{
    validate_birth_date_on, validate_email, validate_fixed_phone, validate_form_on,
    validate_full_name, validate_mobile_phone, validate_national_id, validate_password,
    validate_password_confirmation, validate_postal_code, validate_section_on, FormField,
    FormSection, FormValidation, FormValues, MaskKind, ValidationResult,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Masked value.
#[derive(Debug, Clone, Serialize)]
pub struct MaskReport {
    /// Mask applied
    pub kind: MaskKind,
    /// Formatted value
    pub value: String,
}

impl fmt::Display for MaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Apply a mask.
pub fn mask(kind: MaskKind, raw: &str) -> MaskReport {
    MaskReport {
        kind,
        value: kind.apply(raw),
    }
}

/// Outcome of a single-value validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Whether the value passed
    pub valid: bool,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ValidationResult> for ValidationReport {
    fn from(result: ValidationResult) -> Self {
        Self {
            valid: result.valid,
            message: result.message,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "invalid: {message}"),
            None => f.write_str("valid"),
        }
    }
}

/// Validate one value.
pub fn validate(
    kind: ValidateKind,
    value: &str,
    confirmation: Option<&str>,
    today: NaiveDate,
) -> ValidationReport {
    let result = match kind {
        ValidateKind::NationalId => validate_national_id(value),
        ValidateKind::FullName => validate_full_name(value),
        ValidateKind::BirthDate => validate_birth_date_on(value, today),
        ValidateKind::FixedPhone => validate_fixed_phone(value),
        ValidateKind::MobilePhone => validate_mobile_phone(value),
        ValidateKind::PostalCode => validate_postal_code(value),
        ValidateKind::Email => validate_email(value),
        ValidateKind::Password => validate_password(value),
        ValidateKind::Confirmation => {
            validate_password_confirmation(value, confirmation.unwrap_or_default())
        }
    };
    result.into()
}

/// Outcome of validating a whole form or one section.
#[derive(Debug, Clone, Serialize)]
pub struct FormReport {
    /// Whether the birth date describes a minor
    pub is_minor: bool,
    /// Sections that apply to this person
    pub sections: Vec<FormSection>,
    /// Section that was validated, when only one was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<FormSection>,
    /// Validation result
    #[serde(flatten)]
    pub validation: FormValidation,
}

impl fmt::Display for FormReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.section.map_or("form", FormSection::title);
        if self.validation.valid {
            return write!(f, "{scope}: valid");
        }

        write!(f, "{scope}: {} error(s)", self.validation.errors.len())?;
        for (field, message) in &self.validation.errors {
            write!(f, "\n  {} ({}): {}", field.label(), field, message)?;
        }
        Ok(())
    }
}

/// Read form values from a JSON file and apply each field's mask.
pub fn load_form(path: &Path) -> anyhow::Result<FormValues> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw: FormValues = serde_json::from_str(&contents).with_context(|| {
        format!(
            "invalid form file {} (expected an object with keys among: {})",
            path.display(),
            field_keys().join(", ")
        )
    })?;

    let mut values = FormValues::new();
    for (field, value) in raw.iter() {
        values.set_masked(field, value);
    }
    tracing::debug!(fields = values.iter().count(), "Loaded form values");
    Ok(values)
}

/// Validate a form, or only one of its sections.
pub fn check_form(
    values: &FormValues,
    section: Option<FormSection>,
    today: NaiveDate,
) -> FormReport {
    let is_minor = values.is_minor_on(today);
    let validation = match section {
        Some(section) => validate_section_on(section, values, is_minor, today),
        None => validate_form_on(values, is_minor, today),
    };

    FormReport {
        is_minor,
        sections: FormSection::visible(is_minor),
        section,
        validation,
    }
}

/// Field keys accepted in form files.
pub fn field_keys() -> Vec<&'static str> {
    FormField::ALL.iter().map(|field| field.key()).collect()
}
