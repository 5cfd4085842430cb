//! Cadastro Core - Foundation crate for the cadastro toolkit.
//!
//! This crate provides the shared error types, configuration management and
//! small domain newtypes that the lookup and forms crates build on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`PostalCode`) and text helpers
//!
//! # Example
//!
//! ```rust
//! use cadastro_core::{AppConfig, PostalCode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.lookup.max_attempts, 3);
//!
//! let cep = PostalCode::new("01310-100")?;
//! assert_eq!(cep.as_str(), "01310100");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, LoggingConfig, LookupConfig};
pub use error::{CadastroError, ConfigError, ConfigResult, Result};
pub use types::{digits_only, PostalCode};
