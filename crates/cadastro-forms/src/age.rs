//! Birth-date parsing and age derivation.

use chrono::{Datelike, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Age at which a person no longer needs guardian information.
pub const ADULT_AGE: u32 = 18;

/// Oldest accepted birth date, in years before today.
pub const MAX_AGE_YEARS: u32 = 120;

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("Date regex is hardcoded and valid")
});

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whether `value` has the `DD/MM/YYYY` shape, regardless of calendar validity.
#[must_use]
pub fn has_date_shape(value: &str) -> bool {
    DATE_SHAPE.is_match(value)
}

/// Parse a `DD/MM/YYYY` date. Returns `None` for other shapes or
/// calendrically invalid dates such as `31/02/2000`.
#[must_use]
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_SHAPE.captures(value)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Completed years between `birth` and `today`, or `None` if `birth` is in
/// the future.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }

    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Earliest birth date accepted on `today`.
#[must_use]
pub fn oldest_birth_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// Whether the birth-date field describes someone under [`ADULT_AGE`].
///
/// Incomplete, invalid or future dates count as not minor.
#[must_use]
pub fn is_minor_on(birth_date: &str, today: NaiveDate) -> bool {
    parse_birth_date(birth_date)
        .and_then(|birth| age_on(birth, today))
        .is_some_and(|age| age < ADULT_AGE)
}

/// [`is_minor_on`] evaluated against the local date.
#[must_use]
pub fn is_minor(birth_date: &str) -> bool {
    is_minor_on(birth_date, today())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("29/02/2000"), Some(date(2000, 2, 29)));
        assert_eq!(parse_birth_date("29/02/2001"), None);
        assert_eq!(parse_birth_date("31/04/2010"), None);
        assert_eq!(parse_birth_date("1/1/2000"), None);
        assert_eq!(parse_birth_date("01/01/2000 "), None);
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let birth = date(2008, 10, 19);
        assert_eq!(age_on(birth, date(2026, 10, 18)), Some(17));
        assert_eq!(age_on(birth, date(2026, 10, 19)), Some(18));
        assert_eq!(age_on(birth, date(2008, 10, 18)), None);
    }

    #[test]
    fn test_is_minor_on() {
        let today = date(2026, 10, 19);
        assert!(is_minor_on("20/10/2008", today));
        assert!(!is_minor_on("19/10/2008", today));
        assert!(is_minor_on("19/10/2026", today));
        assert!(!is_minor_on("20/10/20", today));
        assert!(!is_minor_on("", today));
        assert!(!is_minor_on("01/01/2030", today));
    }

    #[test]
    fn test_oldest_birth_date() {
        assert_eq!(oldest_birth_date(date(2026, 10, 19)), date(1906, 10, 19));
        assert_eq!(oldest_birth_date(date(2024, 2, 29)), date(1904, 2, 29));
    }
}
