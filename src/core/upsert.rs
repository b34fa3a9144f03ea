//! Upsert engine for the Budgets and Goals tables.
//!
//! Rows are identified by a natural key (category name, goal name) compared by
//! exact string equality: no trimming, no case folding. Each upsert reads a
//! fresh copy of the table, builds a key → sheet-row map from it, and then
//! either overwrites the value cells of the matching row or appends a new row.
//!
//! Last write wins. Nothing prevents another writer from changing the table
//! between the read and the write, and no locking is attempted.

use crate::{
    core::input::require_name,
    errors::{Error, Result},
    store::{CachedStore, Sheet, Table, TableStore, columns},
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The key existed; its value cells in this sheet row were overwritten
    Updated {
        /// Sheet row written
        row: u32,
    },
    /// The key was new; a row was appended here
    Appended {
        /// Sheet row written
        row: u32,
    },
}

/// Maps each key in `key_column` to the sheet row of its first occurrence.
#[must_use]
pub fn key_rows(sheet: &Sheet, key_column: &str) -> HashMap<String, u32> {
    let mut rows = HashMap::new();
    for record in sheet.records().iter().filter(|r| !r.is_blank()) {
        rows.entry(record.get(key_column).to_raw())
            .or_insert_with(|| record.row());
    }
    rows
}

fn ensure_non_negative(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount {
            input: amount.to_string(),
        });
    }
    Ok(())
}

/// Sets the monthly budget of `category`, creating the row when needed.
pub async fn upsert_budget<S: TableStore>(
    store: &CachedStore<S>,
    category: &str,
    amount: Decimal,
) -> Result<UpsertOutcome> {
    ensure_non_negative(amount)?;
    let sheet = store.load_fresh(Table::Budgets).await?;

    if let Some(&row) = key_rows(&sheet, columns::CATEGORY).get(category) {
        store
            .write_cell(Table::Budgets, row, columns::MONTHLY_BUDGET, amount.into())
            .await?;
        info!("Updated budget '{}' in row {}", category, row);
        return Ok(UpsertOutcome::Updated { row });
    }

    let row = store
        .append(Table::Budgets, vec![category.into(), amount.into()])
        .await?;
    info!("Added budget '{}' in row {}", category, row);
    Ok(UpsertOutcome::Appended { row })
}

/// Sets the target and saved amount of goal `name`, creating the row when needed.
pub async fn upsert_goal<S: TableStore>(
    store: &CachedStore<S>,
    name: &str,
    target: Decimal,
    current: Decimal,
) -> Result<UpsertOutcome> {
    ensure_non_negative(target)?;
    ensure_non_negative(current)?;
    let sheet = store.load_fresh(Table::Goals).await?;

    if let Some(&row) = key_rows(&sheet, columns::GOAL_NAME).get(name) {
        store
            .write_cell(Table::Goals, row, columns::TARGET_AMOUNT, target.into())
            .await?;
        store
            .write_cell(Table::Goals, row, columns::CURRENT_SAVED, current.into())
            .await?;
        info!("Updated goal '{}' in row {}", name, row);
        return Ok(UpsertOutcome::Updated { row });
    }

    let row = store
        .append(
            Table::Goals,
            vec![name.into(), target.into(), current.into()],
        )
        .await?;
    info!("Added goal '{}' in row {}", name, row);
    Ok(UpsertOutcome::Appended { row })
}

/// Budget form submission: trims the category, rejects an empty one, then upserts.
pub async fn submit_budget<S: TableStore>(
    store: &CachedStore<S>,
    category: &str,
    amount: Decimal,
) -> Result<UpsertOutcome> {
    let category = require_name(category, "Enter a category name.")?;
    upsert_budget(store, category, amount).await
}

/// Goal form submission: trims the name, rejects an empty one, then upserts.
pub async fn submit_goal<S: TableStore>(
    store: &CachedStore<S>,
    name: &str,
    target: Decimal,
    current: Decimal,
) -> Result<UpsertOutcome> {
    let name = require_name(name, "Please enter a goal name.")?;
    upsert_goal(store, name, target, current).await
}
