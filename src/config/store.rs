//! Store configuration - connection and schema for the backing spreadsheet store.
//!
//! The store is SQLite accessed through `SeaORM`. The connection is opened once
//! per process and shared by every spreadsheet the user can select.

use crate::config::app::StoreConfig;
use crate::entities::{Cell, CellColumn, Worksheet};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::info;

/// Environment variable holding the store URL
pub const STORE_URL_VAR: &str = "FINANCE_STORE_URL";

/// Resolves the store URL from the environment or the `[store]` section.
///
/// # Errors
/// Returns `Error::Credentials` when neither is set.
pub fn resolve_store_url(config: &StoreConfig) -> Result<String> {
    pick_store_url(std::env::var(STORE_URL_VAR).ok(), config.url.as_deref())
}

fn pick_store_url(from_env: Option<String>, configured: Option<&str>) -> Result<String> {
    from_env
        .filter(|url| !url.trim().is_empty())
        .or_else(|| configured.map(ToString::to_string))
        .ok_or_else(|| Error::Credentials {
            message: format!("set {STORE_URL_VAR} or `store.url` in config.toml"),
        })
}

/// Opens a connection to the store at `url`.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates the worksheet and cell tables if they do not exist yet.
///
/// A cell is unique per worksheet, row and column.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let worksheet_table = schema
        .create_table_from_entity(Worksheet)
        .if_not_exists()
        .to_owned();
    let cell_table = schema
        .create_table_from_entity(Cell)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&worksheet_table)).await?;
    db.execute(builder.build(&cell_table)).await?;

    let coordinates = Index::create()
        .name("idx_cells_coordinates")
        .table(Cell)
        .col(CellColumn::WorksheetId)
        .col(CellColumn::RowNumber)
        .col(CellColumn::ColumnNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&coordinates)).await?;

    Ok(())
}

/// Resolves the URL, connects, and makes sure the schema exists.
///
/// This is the process-wide "authentication" step: it runs once at startup and
/// any failure is fatal.
pub async fn connect(config: &StoreConfig) -> Result<DatabaseConnection> {
    let url = resolve_store_url(config)?;
    let db = create_connection(&url).await?;
    create_tables(&db).await?;
    info!("Connected to backing store.");
    Ok(db)
}
