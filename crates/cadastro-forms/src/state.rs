//! Interactive form state: masked values, live messages, minor flag.

use crate::age::today;
use crate::form::{
    required_fields, validate_field_on, validate_form_on, FormField, FormSection, FormValidation,
    FormValues,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// State of a registration form being filled in.
///
/// Messages are only kept for fields in the current required set, so guardian
/// messages disappear as soon as the birth date stops describing a minor.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    errors: BTreeMap<FormField, String>,
    is_minor: bool,
}

impl FormState {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing values, without any messages.
    #[must_use]
    pub fn from_values_on(values: FormValues, today: NaiveDate) -> Self {
        let is_minor = values.is_minor_on(today);
        Self {
            values,
            errors: BTreeMap::new(),
            is_minor,
        }
    }

    /// Current (masked) values.
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Value of one field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        self.values.get(field)
    }

    /// Current message per field.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<FormField, String> {
        &self.errors
    }

    /// Message for one field, if any.
    #[must_use]
    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether the birth date describes a minor.
    #[must_use]
    pub fn is_minor(&self) -> bool {
        self.is_minor
    }

    /// Sections currently shown.
    #[must_use]
    pub fn visible_sections(&self) -> Vec<FormSection> {
        FormSection::visible(self.is_minor)
    }

    /// Apply a keystroke-level change using the local date.
    pub fn update(&mut self, field: FormField, raw: &str) {
        self.update_on(field, raw, today());
    }

    /// Apply a change: mask, store, re-derive the minor flag, validate.
    pub fn update_on(&mut self, field: FormField, raw: &str, today: NaiveDate) {
        self.values.set_masked(field, raw);

        if field == FormField::BirthDate {
            let is_minor = self.values.is_minor_on(today);
            if is_minor != self.is_minor {
                tracing::debug!(is_minor, "Minor flag changed");
                self.is_minor = is_minor;
            }
        }

        self.revalidate(field, today);
        if field == FormField::Password && !self.value(FormField::PasswordConfirmation).is_empty() {
            self.revalidate(FormField::PasswordConfirmation, today);
        }

        let required = required_fields(self.is_minor);
        self.errors.retain(|field, _| required.contains(field));
    }

    /// Validate the whole form using the local date.
    pub fn submit(&mut self) -> FormValidation {
        self.submit_on(today())
    }

    /// Validate the whole form, replacing every stored message.
    pub fn submit_on(&mut self, today: NaiveDate) -> FormValidation {
        let result = validate_form_on(&self.values, self.is_minor, today);
        self.errors.clone_from(&result.errors);
        result
    }

    fn revalidate(&mut self, field: FormField, today: NaiveDate) {
        match validate_field_on(field, &self.values, self.is_minor, today).message {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn test_update_masks_and_validates() {
        let mut state = FormState::new();
        state.update_on(FormField::NationalId, "1234567890", today());
        assert_eq!(state.value(FormField::NationalId), "123.456.789-0");
        assert_eq!(
            state.error(FormField::NationalId),
            Some("National ID must have 11 digits")
        );

        state.update_on(FormField::NationalId, "123.456.789-09", today());
        assert_eq!(state.error(FormField::NationalId), None);
    }

    #[test]
    fn test_minor_flag_follows_birth_date() {
        let mut state = FormState::new();
        state.update_on(FormField::BirthDate, "01012015", today());
        assert!(state.is_minor());
        assert_eq!(state.visible_sections().len(), 4);

        state.update_on(FormField::FatherName, "", today());
        assert_eq!(state.error(FormField::FatherName), Some("Father's name is required"));

        state.update_on(FormField::BirthDate, "01/01/1990", today());
        assert!(!state.is_minor());
        assert_eq!(state.error(FormField::FatherName), None);
        assert_eq!(state.visible_sections().len(), 3);
    }

    #[test]
    fn test_incomplete_birth_date_is_not_minor() {
        let mut state = FormState::new();
        state.update_on(FormField::BirthDate, "01/01/20", today());
        assert!(!state.is_minor());
        assert_eq!(state.error(FormField::BirthDate), Some("Use the DD/MM/YYYY format"));
    }

    #[test]
    fn test_password_change_rechecks_confirmation() {
        let mut state = FormState::new();
        state.update_on(FormField::Password, "Abcdef12", today());
        state.update_on(FormField::PasswordConfirmation, "Abcdef12", today());
        assert_eq!(state.error(FormField::PasswordConfirmation), None);

        state.update_on(FormField::Password, "Abcdef123", today());
        assert_eq!(
            state.error(FormField::PasswordConfirmation),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_password_change_without_confirmation() {
        let mut state = FormState::new();
        state.update_on(FormField::Password, "Abcdef12", today());
        assert_eq!(state.error(FormField::PasswordConfirmation), None);
    }

    #[test]
    fn test_submit_recomputes_from_scratch() {
        let mut state = FormState::new();
        state.update_on(FormField::FullName, "Maria", today());
        assert_eq!(state.errors().len(), 1);

        let result = state.submit_on(today());
        assert!(!result.valid);
        assert_eq!(state.errors(), &result.errors);
        assert_eq!(result.errors.len(), 13);
    }
}
