//! Shared test utilities.
//!
//! Helpers for an in-memory store with one provisioned spreadsheet, plus
//! seeding functions that write rows the way the forms would.

use crate::{
    config::store::{create_connection, create_tables},
    errors::Result,
    store::{CachedStore, CellValue, SqlTableStore, Table, TableCache},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Spreadsheet name used by every test store.
pub const TEST_SPREADSHEET: &str = "Test Finance Tracker";

/// Routes `tracing` output to the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with the worksheet/cell tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = create_connection("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates a cached store over a freshly provisioned test spreadsheet.
///
/// The cache TTL is the production default of 60 seconds.
pub async fn setup_test_store() -> Result<CachedStore<SqlTableStore>> {
    init_test_tracing();
    let db = setup_test_db().await?;
    SqlTableStore::provision(&db, TEST_SPREADSHEET).await?;
    let store = SqlTableStore::open(db, TEST_SPREADSHEET).await?;
    Ok(CachedStore::new(store, TableCache::new(Duration::from_secs(60))))
}

fn number(raw: &str) -> CellValue {
    Decimal::from_str(raw).map_or_else(|_| CellValue::from(raw), CellValue::Number)
}

/// Appends `(category, monthly budget)` rows.
pub async fn seed_budgets(
    store: &CachedStore<SqlTableStore>,
    rows: &[(&str, i64)],
) -> Result<()> {
    for (category, amount) in rows {
        store
            .append(
                Table::Budgets,
                vec![(*category).into(), Decimal::from(*amount).into()],
            )
            .await?;
    }
    Ok(())
}

/// Appends `(goal name, target, saved)` rows.
pub async fn seed_goals(
    store: &CachedStore<SqlTableStore>,
    rows: &[(&str, i64, i64)],
) -> Result<()> {
    for (name, target, saved) in rows {
        store
            .append(
                Table::Goals,
                vec![
                    (*name).into(),
                    Decimal::from(*target).into(),
                    Decimal::from(*saved).into(),
                ],
            )
            .await?;
    }
    Ok(())
}

/// Appends `(date, category, amount)` transaction rows with filler text fields.
pub async fn seed_transactions(
    store: &CachedStore<SqlTableStore>,
    rows: &[(&str, &str, &str)],
) -> Result<()> {
    for (date, category, amount) in rows {
        store
            .append(
                Table::Transactions,
                vec![
                    (*date).into(),
                    (*category).into(),
                    "Test transaction".into(),
                    number(amount),
                    "Visa".into(),
                    CellValue::Empty,
                    "You".into(),
                ],
            )
            .await?;
    }
    Ok(())
}
