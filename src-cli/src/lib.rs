//! Cadastro Application Shell
//!
//! Thin command-line shell that loads configuration, installs logging and
//! dispatches to the command implementations. Lookup and validation logic
//! lives in the `crates/` directory.

pub mod cli;
pub mod commands;
mod error;

pub use error::CommandError;

use anyhow::Context;
use cadastro_core::{AppConfig, CadastroError};
use cadastro_lookup::AddressResolver;
use cli::{Cli, Command};
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` wins over `default_filter`. Logs go to stderr so JSON output on
/// stdout stays machine-readable.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Already installed when called more than once in-process (tests)
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Load configuration from `path`, or from the default location.
///
/// Environment overrides apply in both cases.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config.validate()?;
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };
    Ok(config)
}

/// Build the resolver described by the lookup configuration.
pub fn build_resolver(config: &AppConfig) -> Result<AddressResolver, CadastroError> {
    Ok(AddressResolver::from_config(&config.lookup)?)
}

fn print_one<T: Serialize + Display>(report: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn print_all<T: Serialize + Display>(reports: &[T], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            println!("{report}");
        }
    }
    Ok(())
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run a parsed command line. The exit code reports lookup or validation
/// failures; `Err` is reserved for configuration and I/O problems.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging.filter);

    info!("Starting cadastro v{}", env!("CARGO_PKG_VERSION"));

    let today = cadastro_forms::age::today();

    match cli.command {
        Command::Lookup {
            postal_codes,
            no_cache,
        } => {
            let resolver = build_resolver(&config)?;
            let reports = commands::lookup_all(&resolver, &postal_codes, !no_cache).await;
            print_all(&reports, cli.json)?;
            Ok(exit_code(reports.iter().all(commands::LookupReport::is_success)))
        }
        Command::Providers => {
            let resolver = build_resolver(&config)?;
            print_all(&commands::providers(&resolver), cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let resolver = build_resolver(&config)?;
            let report = commands::check(&resolver).await;
            print_one(&report, cli.json)?;
            Ok(exit_code(report.connected))
        }
        Command::Mask { kind, value } => {
            print_one(&commands::mask(kind, &value), cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate {
            kind,
            value,
            confirmation,
        } => {
            let report = commands::validate(kind, &value, confirmation.as_deref(), today);
            print_one(&report, cli.json)?;
            Ok(exit_code(report.valid))
        }
        Command::Form { path, section } => {
            let values = commands::load_form(&path)?;
            let report = commands::check_form(&values, section, today);
            print_one(&report, cli.json)?;
            Ok(exit_code(report.validation.valid))
        }
    }
}
