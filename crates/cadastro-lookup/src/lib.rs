//! Cadastro Lookup - Postal-code to address resolution.
//!
//! This crate resolves Brazilian postal codes (CEP) into normalized addresses
//! by querying several public providers in priority order. Each provider gets
//! a bounded number of attempts with a per-request timeout and linear backoff,
//! and successful answers are cached in memory for a configurable TTL.
//!
//! # Features
//!
//! - Ordered provider fallback (ViaCEP, BrasilAPI, APICEP by default)
//! - Per-request timeout and linear backoff between retries
//! - "Not found" detection for providers that answer with HTTP 200
//! - In-memory cache with lazy TTL expiry
//! - Advisory connectivity probe for choosing user-facing messages
//!
//! # Example
//!
//! ```rust,ignore
//! use cadastro_lookup::{AddressResolver, ReqwestFetcher};
//! use std::sync::Arc;
//!
//! let resolver = AddressResolver::with_default_providers(Arc::new(ReqwestFetcher::new()?));
//!
//! match resolver.resolve("01310-100").await {
//!     LookupOutcome::Success { record, source } => println!("{} ({source})", record.one_line()),
//!     LookupOutcome::Failure(failure) => eprintln!("{}", failure.user_message(true)),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod outcome;
pub mod provider;
#[allow(missing_docs)]
pub mod providers;
pub mod resolver;

// Re-export commonly used types
pub use cache::AddressCache;
pub use error::{LookupError, Result};
pub use fetcher::{HttpFetcher, ReqwestFetcher};
pub use outcome::{FailureKind, LookupFailure, LookupOutcome, ProviderFailure, CACHE_SOURCE};
pub use provider::{AddressProvider, AddressRecord, NOT_INFORMED};
pub use providers::{ApiCepProvider, BrasilApiProvider, ViaCepProvider};
pub use resolver::{AddressResolver, RetryPolicy};
