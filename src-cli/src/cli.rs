//! Command-line definition.

use cadastro_forms::{FormSection, MaskKind};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Postal-code lookup and registration form validation.
#[derive(Debug, Parser)]
#[command(name = "cadastro", version, about)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve postal codes to addresses
    Lookup {
        /// Postal codes, with or without the dash
        #[arg(required = true)]
        postal_codes: Vec<String>,

        /// Query the providers even for repeated postal codes
        #[arg(long)]
        no_cache: bool,
    },

    /// List the configured providers in priority order
    Providers,

    /// Check whether the network is reachable
    Check,

    /// Format a value with an input mask
    Mask {
        /// national-id, fixed-phone, mobile-phone, postal-code, date, name, digits or text
        kind: MaskKind,
        /// Raw value
        value: String,
    },

    /// Validate a single value
    Validate {
        /// Kind of value
        #[arg(value_enum)]
        kind: ValidateKind,
        /// Value to check (the password, for `confirmation`)
        value: String,
        /// Confirmation to compare against the password
        #[arg(long)]
        confirmation: Option<String>,
    },

    /// Validate a registration form stored as JSON
    Form {
        /// JSON object keyed by field name (`full_name`, `birth_date`, ...)
        path: PathBuf,
        /// Only validate one section: personal, guardians, address or account
        #[arg(long)]
        section: Option<FormSection>,
    },
}

/// Single-value validators exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateKind {
    /// CPF
    NationalId,
    /// First and last name
    FullName,
    /// `DD/MM/YYYY`
    BirthDate,
    /// Landline
    FixedPhone,
    /// Mobile phone
    MobilePhone,
    /// CEP
    PostalCode,
    /// Email address
    Email,
    /// Password strength
    Password,
    /// Password confirmation
    Confirmation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["cadastro", "--json", "lookup", "01310-100", "20040002"])
            .expect("parse");
        assert!(cli.json);
        match cli.command {
            Command::Lookup {
                postal_codes,
                no_cache,
            } => {
                assert_eq!(postal_codes, vec!["01310-100", "20040002"]);
                assert!(!no_cache);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_requires_a_postal_code() {
        assert!(Cli::try_parse_from(["cadastro", "lookup"]).is_err());
    }

    #[test]
    fn test_parse_mask_and_validate() {
        let cli = Cli::try_parse_from(["cadastro", "mask", "cpf", "12345678909"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Mask {
                kind: MaskKind::NationalId,
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "cadastro",
            "validate",
            "confirmation",
            "Abc12345!",
            "--confirmation",
            "Abc12345",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Validate {
                kind: ValidateKind::Confirmation,
                confirmation: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_form_section() {
        let cli = Cli::try_parse_from(["cadastro", "form", "form.json", "--section", "address"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Form {
                section: Some(FormSection::Address),
                ..
            }
        ));
    }
}
