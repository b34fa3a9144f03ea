//! Form input parsing shared by the presentation layer.
//!
//! Everything here fails with a recoverable error: the user sees a warning and
//! nothing is written.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Rounds to cents, halves away from zero, the way amounts are displayed.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a money amount typed into a form.
///
/// Accepts an optional leading `$` and thousands separators. The result is
/// rounded to cents and must not be negative.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let invalid = || Error::InvalidAmount {
        input: input.to_string(),
    };
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount = Decimal::from_str(&cleaned).map_err(|_| invalid())?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid());
    }
    Ok(round_money(amount))
}

/// Parses a `YYYY-MM-DD` date typed into a form.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("'{input}' is not a date in YYYY-MM-DD form")))
}

/// Trims a natural-key name and rejects it when nothing is left.
pub fn require_name<'a>(input: &'a str, message: &str) -> Result<&'a str> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::validation(message));
    }
    Ok(name)
}
