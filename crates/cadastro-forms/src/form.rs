//! Registration form model and composite validation.

use crate::age::today;
use crate::mask::MaskKind;
use crate::rules::{
    validate_birth_date_on, validate_email, validate_fixed_phone, validate_full_name,
    validate_mobile_phone, validate_national_id, validate_password,
    validate_password_confirmation, validate_postal_code, validate_required, ValidationResult,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A field of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// Full name
    FullName,
    /// Birth date, `DD/MM/YYYY`
    BirthDate,
    /// CPF
    NationalId,
    /// Landline phone
    FixedPhone,
    /// Mobile phone
    MobilePhone,
    /// Father's name, required for minors
    FatherName,
    /// Mother's name, required for minors
    MotherName,
    /// CEP
    PostalCode,
    /// Street
    Street,
    /// House number
    Number,
    /// Address complement, never required
    Complement,
    /// City
    City,
    /// State
    State,
    /// Email
    Email,
    /// Password
    Password,
    /// Password confirmation
    PasswordConfirmation,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [FormField; 16] = [
        FormField::FullName,
        FormField::BirthDate,
        FormField::NationalId,
        FormField::FixedPhone,
        FormField::MobilePhone,
        FormField::FatherName,
        FormField::MotherName,
        FormField::PostalCode,
        FormField::Street,
        FormField::Number,
        FormField::Complement,
        FormField::City,
        FormField::State,
        FormField::Email,
        FormField::Password,
        FormField::PasswordConfirmation,
    ];

    /// Key used in serialized form values.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::BirthDate => "birth_date",
            Self::NationalId => "national_id",
            Self::FixedPhone => "fixed_phone",
            Self::MobilePhone => "mobile_phone",
            Self::FatherName => "father_name",
            Self::MotherName => "mother_name",
            Self::PostalCode => "postal_code",
            Self::Street => "street",
            Self::Number => "number",
            Self::Complement => "complement",
            Self::City => "city",
            Self::State => "state",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirmation => "password_confirmation",
        }
    }

    /// Human-readable label, used in "is required" messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::BirthDate => "Birth date",
            Self::NationalId => "National ID",
            Self::FixedPhone => "Phone",
            Self::MobilePhone => "Mobile phone",
            Self::FatherName => "Father's name",
            Self::MotherName => "Mother's name",
            Self::PostalCode => "Postal code",
            Self::Street => "Street",
            Self::Number => "Number",
            Self::Complement => "Complement",
            Self::City => "City",
            Self::State => "State",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PasswordConfirmation => "Password confirmation",
        }
    }

    /// Mask applied to raw input for this field, if any.
    #[must_use]
    pub fn mask(self) -> Option<MaskKind> {
        match self {
            Self::FullName | Self::FatherName | Self::MotherName => Some(MaskKind::Name),
            Self::BirthDate => Some(MaskKind::Date),
            Self::NationalId => Some(MaskKind::NationalId),
            Self::FixedPhone => Some(MaskKind::FixedPhone),
            Self::MobilePhone => Some(MaskKind::MobilePhone),
            Self::PostalCode => Some(MaskKind::PostalCode),
            Self::Street | Self::Complement | Self::City | Self::State => Some(MaskKind::Text),
            Self::Number => Some(MaskKind::Digits),
            Self::Email | Self::Password | Self::PasswordConfirmation => None,
        }
    }

    /// Whether the field is one of the guardian names.
    #[must_use]
    pub fn is_guardian(self) -> bool {
        matches!(self, Self::FatherName | Self::MotherName)
    }

    /// Whether the field must be filled in, given the minor flag.
    #[must_use]
    pub fn is_required(self, is_minor: bool) -> bool {
        match self {
            Self::Complement => false,
            Self::FatherName | Self::MotherName => is_minor,
            _ => true,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Raw (already masked) values keyed by field. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<FormField, String>);

impl FormValues {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or `""` when unset.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        self.0.get(&field).map_or("", String::as_str)
    }

    /// Store a value as-is.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Store a value after applying the field's mask.
    pub fn set_masked(&mut self, field: FormField, raw: &str) {
        let value = field.mask().map_or_else(|| raw.to_string(), |mask| mask.apply(raw));
        self.set(field, value);
    }

    /// Whether the birth date describes a minor on `today`.
    #[must_use]
    pub fn is_minor_on(&self, today: NaiveDate) -> bool {
        crate::age::is_minor_on(self.get(FormField::BirthDate), today)
    }

    /// Iterate over the stored values in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

impl FromIterator<(FormField, String)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (FormField, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of validating several fields at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValidation {
    /// True iff `errors` is empty
    pub valid: bool,
    /// Message per failing field
    pub errors: BTreeMap<FormField, String>,
}

impl FormValidation {
    fn from_errors(errors: BTreeMap<FormField, String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Fields that must be filled in, in form order.
#[must_use]
pub fn required_fields(is_minor: bool) -> Vec<FormField> {
    FormField::ALL
        .into_iter()
        .filter(|field| field.is_required(is_minor))
        .collect()
}

/// Validate one field against the rest of the form.
///
/// Fields that are not required (the complement, or guardian names for an
/// adult) always pass.
#[must_use]
pub fn validate_field_on(
    field: FormField,
    values: &FormValues,
    is_minor: bool,
    today: NaiveDate,
) -> ValidationResult {
    if !field.is_required(is_minor) {
        return ValidationResult::ok();
    }

    let value = values.get(field);
    match field {
        FormField::FullName => validate_full_name(value),
        FormField::BirthDate => validate_birth_date_on(value, today),
        FormField::NationalId => validate_national_id(value),
        FormField::FixedPhone => validate_fixed_phone(value),
        FormField::MobilePhone => validate_mobile_phone(value),
        FormField::PostalCode => validate_postal_code(value),
        FormField::Email => validate_email(value),
        FormField::Password => validate_password(value),
        FormField::PasswordConfirmation => {
            validate_password_confirmation(values.get(FormField::Password), value)
        }
        FormField::FatherName
        | FormField::MotherName
        | FormField::Street
        | FormField::Number
        | FormField::Complement
        | FormField::City
        | FormField::State => validate_required(value, field.label()),
    }
}

fn validate_fields_on<I>(
    fields: I,
    values: &FormValues,
    is_minor: bool,
    today: NaiveDate,
) -> FormValidation
where
    I: IntoIterator<Item = FormField>,
{
    let errors = fields
        .into_iter()
        .filter_map(|field| {
            validate_field_on(field, values, is_minor, today)
                .message
                .map(|message| (field, message))
        })
        .collect();

    FormValidation::from_errors(errors)
}

/// Validate every required field. Never stops at the first failure.
#[must_use]
pub fn validate_form_on(values: &FormValues, is_minor: bool, today: NaiveDate) -> FormValidation {
    let result = validate_fields_on(required_fields(is_minor), values, is_minor, today);
    tracing::debug!(
        valid = result.valid,
        errors = result.errors.len(),
        "Validated form"
    );
    result
}

/// [`validate_form_on`] evaluated against the local date.
#[must_use]
pub fn validate_form(values: &FormValues, is_minor: bool) -> FormValidation {
    validate_form_on(values, is_minor, today())
}

/// A tab of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    /// Identity and contact details
    Personal,
    /// Guardian names, shown only for minors
    Guardians,
    /// Postal address
    Address,
    /// Login credentials
    Account,
}

impl FormSection {
    /// Every section, in display order.
    pub const ALL: [FormSection; 4] = [
        FormSection::Personal,
        FormSection::Guardians,
        FormSection::Address,
        FormSection::Account,
    ];

    /// Fields shown in this section.
    #[must_use]
    pub fn fields(self) -> &'static [FormField] {
        match self {
            Self::Personal => &[
                FormField::FullName,
                FormField::BirthDate,
                FormField::NationalId,
                FormField::FixedPhone,
                FormField::MobilePhone,
            ],
            Self::Guardians => &[FormField::FatherName, FormField::MotherName],
            Self::Address => &[
                FormField::PostalCode,
                FormField::Street,
                FormField::Number,
                FormField::Complement,
                FormField::City,
                FormField::State,
            ],
            Self::Account => &[
                FormField::Email,
                FormField::Password,
                FormField::PasswordConfirmation,
            ],
        }
    }

    /// Whether the section is shown.
    #[must_use]
    pub fn is_visible(self, is_minor: bool) -> bool {
        self != Self::Guardians || is_minor
    }

    /// Sections shown for the given minor flag, in display order.
    #[must_use]
    pub fn visible(is_minor: bool) -> Vec<FormSection> {
        Self::ALL
            .into_iter()
            .filter(|section| section.is_visible(is_minor))
            .collect()
    }

    /// Section title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Personal => "Personal information",
            Self::Guardians => "Guardians",
            Self::Address => "Address",
            Self::Account => "Account",
        }
    }

    /// Section containing `field`.
    #[must_use]
    pub fn of(field: FormField) -> FormSection {
        Self::ALL
            .into_iter()
            .find(|section| section.fields().contains(&field))
            .unwrap_or(Self::Personal)
    }
}

impl FromStr for FormSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "guardians" => Ok(Self::Guardians),
            "address" => Ok(Self::Address),
            "account" => Ok(Self::Account),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

/// Validate only the fields of one section. A hidden section always passes.
#[must_use]
pub fn validate_section_on(
    section: FormSection,
    values: &FormValues,
    is_minor: bool,
    today: NaiveDate,
) -> FormValidation {
    if !section.is_visible(is_minor) {
        return FormValidation::from_errors(BTreeMap::new());
    }
    validate_fields_on(section.fields().iter().copied(), values, is_minor, today)
}

/// [`validate_section_on`] evaluated against the local date.
#[must_use]
pub fn validate_section(
    section: FormSection,
    values: &FormValues,
    is_minor: bool,
) -> FormValidation {
    validate_section_on(section, values, is_minor, today())
}
