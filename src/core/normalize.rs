//! Normalization - raw sheet records to typed entities.
//!
//! The two field kinds follow different policies. A transaction date that is
//! missing or unparsable fails the whole batch. A numeric field that does not
//! parse is read as zero. Fully blank rows are skipped. A table with no data
//! rows normalizes to an empty list, the same as a table that was never written.

use super::models::{BudgetEntry, GoalEntry, Transaction};
use crate::{
    errors::{Error, Result},
    store::{CellValue, Record, Sheet, columns},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, warn};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d", "%b %d, %Y", "%d %b %Y"];

/// Parses the date formats a sheet is likely to hold. Bare dates map to midnight.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Reads a cell as a decimal, falling back to zero.
#[must_use]
pub fn coerce_decimal(cell: &CellValue) -> Decimal {
    match cell {
        CellValue::Empty => Decimal::ZERO,
        CellValue::Number(n) => *n,
        CellValue::Text(t) => {
            let t = t.trim();
            Decimal::from_str(t)
                .or_else(|_| Decimal::from_scientific(t))
                .unwrap_or_else(|_| {
                    warn!("Non-numeric value '{}' read as 0", t);
                    Decimal::ZERO
                })
        }
    }
}

fn text(record: &Record, column: &str) -> String {
    record.get(column).to_raw()
}

fn data_records(sheet: &Sheet) -> impl Iterator<Item = &Record> {
    sheet.records().iter().filter(|r| !r.is_blank())
}

/// Normalizes the Transactions sheet.
///
/// # Errors
/// `Error::InvalidDate` for the first row whose date is missing or unparsable.
pub fn transactions(sheet: &Sheet) -> Result<Vec<Transaction>> {
    data_records(sheet)
        .map(|record| -> Result<Transaction> {
            let raw_date = text(record, columns::DATE);
            let date = parse_date(&raw_date).ok_or_else(|| {
                error!("Unparsable date '{}' in row {}", raw_date, record.row());
                Error::InvalidDate {
                    table: sheet.table().title().to_string(),
                    row: record.row(),
                    value: raw_date.clone(),
                }
            })?;
            Ok(Transaction {
                date,
                category: text(record, columns::CATEGORY),
                description: text(record, columns::DESCRIPTION),
                amount: coerce_decimal(record.get(columns::AMOUNT)),
                payment_method: text(record, columns::PAYMENT_METHOD),
                notes: text(record, columns::NOTES),
                payer: text(record, columns::PAYER),
            })
        })
        .collect()
}

/// Normalizes the Budgets sheet.
#[must_use]
pub fn budgets(sheet: &Sheet) -> Vec<BudgetEntry> {
    data_records(sheet)
        .map(|record| BudgetEntry {
            category: text(record, columns::CATEGORY),
            monthly_budget: coerce_decimal(record.get(columns::MONTHLY_BUDGET)),
        })
        .collect()
}

/// Normalizes the Goals sheet.
#[must_use]
pub fn goals(sheet: &Sheet) -> Vec<GoalEntry> {
    data_records(sheet)
        .map(|record| GoalEntry {
            goal_name: text(record, columns::GOAL_NAME),
            target_amount: coerce_decimal(record.get(columns::TARGET_AMOUNT)),
            current_saved: coerce_decimal(record.get(columns::CURRENT_SAVED)),
        })
        .collect()
}
