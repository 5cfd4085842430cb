//! Input masks applied to raw keystrokes.
//!
//! Every mask is pure and idempotent: applying it to its own output returns
//! the same string. Separators are inserted progressively, only once a digit
//! follows them, so partially typed values stay readable.

use cadastro_core::digits_only;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formatting transform for one kind of field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskKind {
    /// CPF, `XXX.XXX.XXX-XX`
    NationalId,
    /// Landline, `(XX) XXXX-XXXX`
    FixedPhone,
    /// Mobile, `(XX) 9XXXX-XXXX`
    MobilePhone,
    /// CEP, `XXXXX-XXX`
    PostalCode,
    /// `DD/MM/YYYY`
    Date,
    /// Letters, Latin-1 accented letters and whitespace
    Name,
    /// Digits only
    Digits,
    /// Leading whitespace removed, whitespace runs collapsed
    Text,
}

impl MaskKind {
    /// Every mask, in declaration order.
    pub const ALL: [MaskKind; 8] = [
        MaskKind::NationalId,
        MaskKind::FixedPhone,
        MaskKind::MobilePhone,
        MaskKind::PostalCode,
        MaskKind::Date,
        MaskKind::Name,
        MaskKind::Digits,
        MaskKind::Text,
    ];

    /// Apply the mask to a raw input string.
    #[must_use]
    pub fn apply(self, raw: &str) -> String {
        match self {
            Self::NationalId => group(&self.significant(raw), &[(3, "."), (6, "."), (9, "-")]),
            Self::FixedPhone => phone(&self.significant(raw), 6),
            Self::MobilePhone => phone(&self.significant(raw), 7),
            Self::PostalCode => group(&self.significant(raw), &[(5, "-")]),
            Self::Date => group(&self.significant(raw), &[(2, "/"), (4, "/")]),
            Self::Name => raw.chars().filter(|&c| is_name_char(c)).collect(),
            Self::Digits => digits_only(raw),
            Self::Text => collapse_whitespace(raw),
        }
    }

    /// Maximum number of significant digits kept, if bounded.
    #[must_use]
    pub fn max_significant(self) -> Option<usize> {
        match self {
            Self::NationalId | Self::MobilePhone => Some(11),
            Self::FixedPhone => Some(10),
            Self::PostalCode | Self::Date => Some(8),
            Self::Name | Self::Digits | Self::Text => None,
        }
    }

    /// Maximum length of the formatted value, if bounded.
    #[must_use]
    pub fn max_display_len(self) -> Option<usize> {
        match self {
            Self::NationalId | Self::FixedPhone => Some(14),
            Self::MobilePhone => Some(15),
            Self::PostalCode => Some(9),
            Self::Date => Some(10),
            Self::Name | Self::Digits | Self::Text => None,
        }
    }

    /// Identifier used on the command line and in serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NationalId => "national-id",
            Self::FixedPhone => "fixed-phone",
            Self::MobilePhone => "mobile-phone",
            Self::PostalCode => "postal-code",
            Self::Date => "date",
            Self::Name => "name",
            Self::Digits => "digits",
            Self::Text => "text",
        }
    }

    fn significant(self, raw: &str) -> String {
        let mut digits = digits_only(raw);
        if let Some(max) = self.max_significant() {
            digits.truncate(max);
        }
        digits
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "national-id" | "cpf" => Ok(Self::NationalId),
            "fixed-phone" | "phone" => Ok(Self::FixedPhone),
            "mobile-phone" | "mobile" => Ok(Self::MobilePhone),
            "postal-code" | "cep" => Ok(Self::PostalCode),
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "digits" => Ok(Self::Digits),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown mask: {other}")),
        }
    }
}

/// Insert `sep` before the digit at each index, when that digit exists.
fn group(digits: &str, breaks: &[(usize, &str)]) -> String {
    let mut out = String::with_capacity(digits.len() + breaks.len() * 2);
    for (i, c) in digits.chars().enumerate() {
        if let Some((_, sep)) = breaks.iter().find(|(at, _)| *at == i) {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

/// `(AA) NNNN-NNNN`; the area code is only wrapped once a third digit arrives.
fn phone(digits: &str, dash_at: usize) -> String {
    let body = group(digits, &[(2, ") "), (dash_at, "-")]);
    if digits.len() > 2 {
        format!("({body}")
    } else {
        body
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c.is_whitespace()
        || (('\u{C0}'..='\u{FF}').contains(&c) && c != '\u{D7}' && c != '\u{F7}')
}

fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.trim_start().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
