//! Calendar date and shelf-life formats.
//!
//! Dates are stored as `YYYY-MM-DD` strings. Shelf life is stored as an amount
//! followed by a unit, e.g. `"7 days"`, `"2w"`, `"6 months"`, `"1 year"`. A bare
//! number means days. Malformed input is rejected with `DomainError::Parse`;
//! nothing here guesses or falls back to a default.

use core::fmt;
use core::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use foodrecords_core::{DomainError, DomainResult, ValueObject};

/// Storage format of every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date string.
pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::parse(format!("date '{s}' is not YYYY-MM-DD: {e}")))
}

/// Render a date in the storage format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// How long a food item stays good after its production date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum ShelfLife {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl ValueObject for ShelfLife {}

impl ShelfLife {
    /// The expiration date of something produced on `production`.
    ///
    /// Months and years use calendar arithmetic, clamped to the end of the
    /// month (Jan 31 + 1 month = Feb 28/29).
    pub fn expiration_from(&self, production: NaiveDate) -> DomainResult<NaiveDate> {
        let expiration = match *self {
            ShelfLife::Days(n) => production.checked_add_days(chrono::Days::new(u64::from(n))),
            ShelfLife::Weeks(n) => {
                production.checked_add_days(chrono::Days::new(u64::from(n) * 7))
            }
            ShelfLife::Months(n) => production.checked_add_months(Months::new(n)),
            ShelfLife::Years(n) => n
                .checked_mul(12)
                .and_then(|months| production.checked_add_months(Months::new(months))),
        };

        expiration.ok_or_else(|| {
            DomainError::validation(format!(
                "shelf life '{self}' from {production} is out of calendar range"
            ))
        })
    }

    pub fn amount(&self) -> u32 {
        match *self {
            ShelfLife::Days(n) | ShelfLife::Weeks(n) | ShelfLife::Months(n) | ShelfLife::Years(n) => {
                n
            }
        }
    }
}

impl fmt::Display for ShelfLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match *self {
            ShelfLife::Days(n) => (n, "day"),
            ShelfLife::Weeks(n) => (n, "week"),
            ShelfLife::Months(n) => (n, "month"),
            ShelfLife::Years(n) => (n, "year"),
        };
        if n == 1 {
            write!(f, "{n} {unit}")
        } else {
            write!(f, "{n} {unit}s")
        }
    }
}

impl FromStr for ShelfLife {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if digits_end == 0 {
            return Err(DomainError::parse(format!(
                "shelf life '{s}' must start with a number"
            )));
        }

        let amount: u32 = trimmed[..digits_end]
            .parse()
            .map_err(|e| DomainError::parse(format!("shelf life '{s}': {e}")))?;

        let unit = trimmed[digits_end..].trim().to_ascii_lowercase();
        match unit.as_str() {
            "" | "d" | "day" | "days" => Ok(ShelfLife::Days(amount)),
            "w" | "week" | "weeks" => Ok(ShelfLife::Weeks(amount)),
            "m" | "month" | "months" => Ok(ShelfLife::Months(amount)),
            "y" | "year" | "years" => Ok(ShelfLife::Years(amount)),
            other => Err(DomainError::parse(format!(
                "shelf life '{s}' has unknown unit '{other}'"
            ))),
        }
    }
}
