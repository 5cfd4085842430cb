//! Cadastro Forms - Input masks and registration form validation.
//!
//! Everything in this crate is a pure function of its inputs: masks format
//! raw keystrokes, validators return a [`ValidationResult`] for any string,
//! and the composite validator reports every failing field at once.
//!
//! # Example
//!
//! ```rust
//! use cadastro_forms::{validate_national_id, MaskKind};
//!
//! let cpf = MaskKind::NationalId.apply("12345678909");
//! assert_eq!(cpf, "123.456.789-09");
//! assert!(validate_national_id(&cpf).valid);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod age;
pub mod form;
pub mod mask;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use age::{age_on, is_minor, is_minor_on, parse_birth_date, ADULT_AGE};
pub use form::{
    required_fields, validate_field_on, validate_form, validate_form_on, validate_section,
    validate_section_on, FormField, FormSection, FormValidation, FormValues,
};
pub use mask::MaskKind;
pub use rules::{
    validate_birth_date, validate_birth_date_on, validate_email, validate_fixed_phone,
    validate_full_name, validate_mobile_phone, validate_national_id, validate_password,
    validate_password_confirmation, validate_postal_code, validate_required, ValidationResult,
};
pub use state::FormState;
