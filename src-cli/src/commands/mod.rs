//! Command implementations.
//!
//! Each command returns a serializable report; printing is left to the caller.

pub mod forms;
pub mod lookup;

pub use forms::{check_form, load_form, mask, validate, FormReport, MaskReport, ValidationReport};
pub use lookup::{
    check, lookup, lookup_all, providers, ConnectivityReport, LookupReport, ProviderEntry,
};
