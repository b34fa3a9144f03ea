//! Expense entry: validating a submitted expense and appending it as a
//! Transactions row. Transactions are append-only.

use super::{
    input::{require_name, round_money},
    models::Transaction,
};
use crate::{
    errors::{Error, Result},
    store::{CachedStore, CellValue, Table, TableStore},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::info;

/// Date format written to the sheet for new expenses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An expense as submitted through the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Day the money was spent
    pub date: NaiveDate,
    /// Category label
    pub category: String,
    /// What it was for
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

impl NewExpense {
    /// Trims text fields, requires a category and rounds the amount to cents.
    ///
    /// # Errors
    /// `Error::Validation` for an empty category, `Error::InvalidAmount` for a
    /// negative amount.
    pub fn validate(self) -> Result<Self> {
        let category = require_name(&self.category, "Choose a category.")?.to_string();
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(Error::InvalidAmount {
                input: self.amount.to_string(),
            });
        }
        Ok(Self {
            date: self.date,
            category,
            description: self.description.trim().to_string(),
            amount: round_money(self.amount),
            payment_method: self.payment_method.trim().to_string(),
            notes: self.notes.trim().to_string(),
            payer: self.payer.trim().to_string(),
        })
    }

    /// Cell values in Transactions column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            self.date.format(DATE_FORMAT).to_string().into(),
            self.category.as_str().into(),
            self.description.as_str().into(),
            self.amount.into(),
            self.payment_method.as_str().into(),
            self.notes.as_str().into(),
            self.payer.as_str().into(),
        ]
    }

    /// The transaction this expense reads back as.
    #[must_use]
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            date: self.date.and_time(NaiveTime::MIN),
            category: self.category.clone(),
            description: self.description.clone(),
            amount: self.amount,
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
            payer: self.payer.clone(),
        }
    }
}

/// Validates `expense` and appends it to the Transactions table.
pub async fn record_expense<S: TableStore>(
    store: &CachedStore<S>,
    expense: NewExpense,
) -> Result<Transaction> {
    let expense = expense.validate()?;
    let row = store.append(Table::Transactions, expense.to_row()).await?;
    info!(
        "Recorded expense of {} in '{}' at row {}",
        expense.amount, expense.category, row
    );
    Ok(expense.to_transaction())
}

/// Category choices for the entry form: configured defaults plus every
/// budgeted category, sorted and deduplicated.
#[must_use]
pub fn category_options<'a, D, B>(defaults: D, budgeted: B) -> Vec<String>
where
    D: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    defaults
        .into_iter()
        .chain(budgeted)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
