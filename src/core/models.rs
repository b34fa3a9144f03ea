//! Typed entities read from the three worksheets.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One recorded expense. Never edited or deleted once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Date cell as parsed; midnight when the sheet holds a bare date
    pub date: NaiveDateTime,
    /// Free-text category label, matched against budgets by exact name
    pub category: String,
    /// What the money was spent on
    pub description: String,
    /// Amount spent
    pub amount: Decimal,
    /// Card, account or cash
    pub payment_method: String,
    /// Optional remarks
    pub notes: String,
    /// Who paid
    pub payer: String,
}

impl Transaction {
    /// Calendar date, time of day discarded.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Month the transaction falls in.
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.day())
    }
}

/// Monthly budget for one category; the category name is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Category name
    pub category: String,
    /// Monthly limit
    pub monthly_budget: Decimal,
}

/// A savings goal; the goal name is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEntry {
    /// Goal name
    pub goal_name: String,
    /// Amount to reach
    pub target_amount: Decimal,
    /// Amount saved so far
    pub current_saved: Decimal,
}

/// Year and month, displayed as `YYYY-MM`.
///
/// Ordering is chronological, which for four-digit years is also the
/// lexicographic order of the display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Builds a key; `None` unless `month` is 1 through 12.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1 through 12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("'{s}' is not a month in YYYY-MM form"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}
