//! `SqlTableStore` - the spreadsheet emulated on top of `SeaORM`.
//!
//! A store is bound to one spreadsheet and the worksheet ids of its three
//! required tables, resolved once in `open`.

use super::{CellValue, Record, Sheet, Table, TableStore, a1_address};
use crate::{
    entities::{Cell, Worksheet, cell, worksheet},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

const HEADER_ROW: i64 = 1;

/// Table store backed by the `worksheets`/`cells` tables.
///
/// Writes through clones of one store are serialized, so two appends never
/// read the same last row.
#[derive(Debug, Clone)]
pub struct SqlTableStore {
    db: DatabaseConnection,
    spreadsheet: String,
    worksheets: HashMap<Table, i64>,
    writes: Arc<Mutex<()>>,
}

impl SqlTableStore {
    /// Opens `spreadsheet`, verifying that every required worksheet exists.
    ///
    /// # Errors
    /// `Error::TableMissing` names the first absent worksheet; database errors
    /// are passed through.
    #[instrument(skip(db))]
    pub async fn open(db: DatabaseConnection, spreadsheet: &str) -> Result<Self> {
        let tabs = Worksheet::find()
            .filter(worksheet::Column::Spreadsheet.eq(spreadsheet))
            .all(&db)
            .await?;
        debug!(
            "Available worksheets: {:?}",
            tabs.iter().map(|w| w.title.as_str()).collect::<Vec<_>>()
        );

        let mut worksheets = HashMap::new();
        for table in Table::ALL {
            let Some(tab) = tabs.iter().find(|w| w.title == table.title()) else {
                error!("Worksheet '{}' not found in '{}'", table, spreadsheet);
                return Err(Error::TableMissing {
                    spreadsheet: spreadsheet.to_string(),
                    table: table.title().to_string(),
                });
            };
            worksheets.insert(table, tab.id);
        }

        info!("Opened spreadsheet '{}'", spreadsheet);
        Ok(Self {
            db,
            spreadsheet: spreadsheet.to_string(),
            worksheets,
            writes: Arc::new(Mutex::new(())),
        })
    }

    /// Creates any missing required worksheet of `spreadsheet` with its header row.
    ///
    /// Returns the number of worksheets created.
    #[instrument(skip(db))]
    pub async fn provision(db: &DatabaseConnection, spreadsheet: &str) -> Result<usize> {
        let mut created = 0;
        for table in Table::ALL {
            let existing = Worksheet::find()
                .filter(worksheet::Column::Spreadsheet.eq(spreadsheet))
                .filter(worksheet::Column::Title.eq(table.title()))
                .one(db)
                .await?;
            if existing.is_some() {
                continue;
            }

            let tab = worksheet::ActiveModel {
                spreadsheet: Set(spreadsheet.to_string()),
                title: Set(table.title().to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;

            let headers = table.headers().iter().map(ToString::to_string).collect();
            insert_row(db, tab.id, HEADER_ROW, headers).await?;
            info!("Created worksheet '{}' in '{}'", table, spreadsheet);
            created += 1;
        }
        Ok(created)
    }

    /// Name of the spreadsheet this store is bound to.
    #[must_use]
    pub fn spreadsheet(&self) -> &str {
        &self.spreadsheet
    }

    fn worksheet_id(&self, table: Table) -> Result<i64> {
        self.worksheets
            .get(&table)
            .copied()
            .ok_or_else(|| Error::TableMissing {
                spreadsheet: self.spreadsheet.clone(),
                table: table.title().to_string(),
            })
    }

    async fn header_column(&self, worksheet_id: i64, table: Table, column: &str) -> Result<i64> {
        Cell::find()
            .filter(cell::Column::WorksheetId.eq(worksheet_id))
            .filter(cell::Column::RowNumber.eq(HEADER_ROW))
            .filter(cell::Column::Value.eq(column))
            .order_by_asc(cell::Column::ColumnNumber)
            .one(&self.db)
            .await?
            .map(|c| c.column_number)
            .ok_or_else(|| Error::ColumnMissing {
                table: table.title().to_string(),
                column: column.to_string(),
            })
    }
}

async fn insert_row<C>(db: &C, worksheet_id: i64, row: i64, values: Vec<String>) -> Result<()>
where
    C: ConnectionTrait,
{
    let cells = (1i64..).zip(values).map(|(column, value)| cell::ActiveModel {
        worksheet_id: Set(worksheet_id),
        row_number: Set(row),
        column_number: Set(column),
        value: Set(value),
        ..Default::default()
    });
    Cell::insert_many(cells).exec(db).await?;
    Ok(())
}

fn to_sheet_row(row: i64) -> Result<u32> {
    u32::try_from(row).map_err(|_| Error::RowOutOfRange { row })
}

/// Groups sparse cells into a header row and header-keyed records.
fn assemble(table: Table, cells: Vec<cell::Model>) -> Result<Sheet> {
    let mut rows: BTreeMap<i64, BTreeMap<i64, String>> = BTreeMap::new();
    for c in cells {
        rows.entry(c.row_number)
            .or_default()
            .insert(c.column_number, c.value);
    }

    let header_cells = rows.remove(&HEADER_ROW).unwrap_or_default();
    let headers: Vec<(i64, String)> = header_cells
        .into_iter()
        .filter(|(_, name)| !name.is_empty())
        .collect();
    let last_row = rows.keys().next_back().copied().unwrap_or(HEADER_ROW);

    let mut records = Vec::new();
    for row in (HEADER_ROW + 1)..=last_row {
        let values = rows.remove(&row).unwrap_or_default();
        let record = headers
            .iter()
            .map(|(column, name)| {
                let value = values
                    .get(column)
                    .map_or(CellValue::Empty, |raw| CellValue::numericise(raw));
                (name.clone(), value)
            })
            .collect();
        records.push(Record::new(to_sheet_row(row)?, record));
    }

    Ok(Sheet::new(
        table,
        headers.into_iter().map(|(_, name)| name).collect(),
        records,
    ))
}

impl TableStore for SqlTableStore {
    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet))]
    async fn load(&self, table: Table) -> Result<Sheet> {
        let worksheet_id = self.worksheet_id(table)?;
        let cells = Cell::find()
            .filter(cell::Column::WorksheetId.eq(worksheet_id))
            .order_by_asc(cell::Column::RowNumber)
            .order_by_asc(cell::Column::ColumnNumber)
            .all(&self.db)
            .await?;
        let sheet = assemble(table, cells)?;
        debug!("Loaded {} rows from '{}'", sheet.records().len(), table);
        Ok(sheet)
    }

    #[instrument(skip(self, values), fields(spreadsheet = %self.spreadsheet))]
    async fn append(&self, table: Table, values: Vec<CellValue>) -> Result<u32> {
        if values.is_empty() {
            return Err(Error::validation("Cannot append an empty row"));
        }
        let worksheet_id = self.worksheet_id(table)?;
        let _guard = self.writes.lock().await;
        let last_row = Cell::find()
            .filter(cell::Column::WorksheetId.eq(worksheet_id))
            .order_by_desc(cell::Column::RowNumber)
            .one(&self.db)
            .await?
            .map_or(HEADER_ROW, |c| c.row_number);
        let row = last_row + 1;

        let raw = values.iter().map(CellValue::to_raw).collect();
        insert_row(&self.db, worksheet_id, row, raw).await?;
        info!("Appended row {} to '{}'", row, table);
        to_sheet_row(row)
    }

    #[instrument(skip(self, value), fields(spreadsheet = %self.spreadsheet))]
    async fn write_cell(&self, table: Table, row: u32, column: &str, value: CellValue) -> Result<()> {
        let row = i64::from(row);
        if row <= HEADER_ROW {
            return Err(Error::RowOutOfRange { row });
        }
        let worksheet_id = self.worksheet_id(table)?;
        let column_number = self.header_column(worksheet_id, table, column).await?;

        let _guard = self.writes.lock().await;
        let existing = Cell::find()
            .filter(cell::Column::WorksheetId.eq(worksheet_id))
            .filter(cell::Column::RowNumber.eq(row))
            .filter(cell::Column::ColumnNumber.eq(column_number))
            .one(&self.db)
            .await?;

        match existing {
            Some(found) => {
                let mut active_model: cell::ActiveModel = found.into();
                active_model.value = Set(value.to_raw());
                active_model.update(&self.db).await?;
            }
            None => {
                cell::ActiveModel {
                    worksheet_id: Set(worksheet_id),
                    row_number: Set(row),
                    column_number: Set(column_number),
                    value: Set(value.to_raw()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
            }
        }

        // Both numbers come from u32 sheet coordinates
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let address = a1_address(column_number as u32, row as u32);
        info!("Updated {}!{} = {}", table, address, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use crate::test_utils::{TEST_SPREADSHEET, setup_test_db};
    use rust_decimal::Decimal;

    async fn open_provisioned() -> Result<SqlTableStore> {
        let db = setup_test_db().await?;
        SqlTableStore::provision(&db, TEST_SPREADSHEET).await?;
        SqlTableStore::open(db, TEST_SPREADSHEET).await
    }

    #[tokio::test]
    async fn test_open_missing_spreadsheet_is_fatal() -> Result<()> {
        let db = setup_test_db().await?;
        let result = SqlTableStore::open(db, "Nowhere").await;
        match result {
            Err(Error::TableMissing { spreadsheet, table }) => {
                assert_eq!(spreadsheet, "Nowhere");
                assert_eq!(table, "Transactions");
            }
            other => panic!("expected TableMissing, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_open_partial_spreadsheet_names_missing_table() -> Result<()> {
        let db = setup_test_db().await?;
        worksheet::ActiveModel {
            spreadsheet: Set("Partial".to_string()),
            title: Set("Transactions".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let result = SqlTableStore::open(db, "Partial").await;
        assert!(matches!(
            result,
            Err(Error::TableMissing { ref table, .. }) if table == "Budgets"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(SqlTableStore::provision(&db, TEST_SPREADSHEET).await?, 3);
        assert_eq!(SqlTableStore::provision(&db, TEST_SPREADSHEET).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_fresh_sheet_has_headers_and_no_rows() -> Result<()> {
        let store = open_provisioned().await?;
        let sheet = store.load(Table::Transactions).await?;
        assert!(sheet.is_empty());
        assert_eq!(sheet.headers().len(), 7);
        assert_eq!(sheet.headers()[0], "Date");
        Ok(())
    }

    #[tokio::test]
    async fn test_append_assigns_consecutive_rows() -> Result<()> {
        let store = open_provisioned().await?;
        let first = store
            .append(
                Table::Budgets,
                vec!["Food".into(), Decimal::new(500, 0).into()],
            )
            .await?;
        let second = store
            .append(
                Table::Budgets,
                vec!["Rent".into(), Decimal::new(1200, 0).into()],
            )
            .await?;
        assert_eq!(first, 2);
        assert_eq!(second, 3);

        let sheet = store.load(Table::Budgets).await?;
        assert_eq!(sheet.records().len(), 2);
        assert_eq!(sheet.records()[1].row(), 3);
        assert_eq!(
            sheet.records()[1].get("Monthly Budget"),
            &CellValue::Number(Decimal::new(1200, 0))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_rows() -> Result<()> {
        let store = open_provisioned().await?;
        let other = store.clone();
        let (first, second) = tokio::join!(
            store.append(
                Table::Budgets,
                vec!["Food".into(), Decimal::new(500, 0).into()],
            ),
            other.append(
                Table::Budgets,
                vec!["Rent".into(), Decimal::new(1200, 0).into()],
            ),
        );
        let mut rows = vec![first?, second?];
        rows.sort_unstable();
        assert_eq!(rows, vec![2, 3]);

        let sheet = store.load(Table::Budgets).await?;
        let categories: Vec<&CellValue> =
            sheet.records().iter().map(|r| r.get("Category")).collect();
        assert_eq!(categories.len(), 2);
        assert!(categories.contains(&&CellValue::Text("Food".to_string())));
        assert!(categories.contains(&&CellValue::Text("Rent".to_string())));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_cell_overwrites_single_cell() -> Result<()> {
        let store = open_provisioned().await?;
        store
            .append(
                Table::Goals,
                vec![
                    "Vacation".into(),
                    Decimal::new(2000, 0).into(),
                    Decimal::new(150, 0).into(),
                ],
            )
            .await?;

        store
            .write_cell(
                Table::Goals,
                2,
                "Current Saved",
                Decimal::new(40050, 2).into(),
            )
            .await?;

        let sheet = store.load(Table::Goals).await?;
        let record = &sheet.records()[0];
        assert_eq!(record.get("Goal Name"), &CellValue::Text("Vacation".to_string()));
        assert_eq!(
            record.get("Target Amount"),
            &CellValue::Number(Decimal::new(2000, 0))
        );
        assert_eq!(
            record.get("Current Saved"),
            &CellValue::Number(Decimal::new(40050, 2))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_write_cell_rejects_header_row_and_unknown_column() -> Result<()> {
        let store = open_provisioned().await?;
        let header = store
            .write_cell(Table::Budgets, 1, "Category", "x".into())
            .await;
        assert!(matches!(header, Err(Error::RowOutOfRange { row: 1 })));

        let unknown = store
            .write_cell(Table::Budgets, 2, "Weekly Budget", "x".into())
            .await;
        assert!(matches!(unknown, Err(Error::ColumnMissing { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_append_empty_row_rejected() -> Result<()> {
        let store = open_provisioned().await?;
        let result = store.append(Table::Transactions, Vec::new()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[test]
    fn test_assemble_keeps_gaps_as_blank_records() -> Result<()> {
        let cell = |row: i64, column: i64, value: &str| cell::Model {
            id: 0,
            worksheet_id: 1,
            row_number: row,
            column_number: column,
            value: value.to_string(),
        };
        let sheet = assemble(
            Table::Budgets,
            vec![
                cell(1, 1, "Category"),
                cell(1, 2, "Monthly Budget"),
                cell(2, 1, "Food"),
                cell(2, 2, "500"),
                cell(4, 1, "Rent"),
            ],
        )?;
        assert_eq!(sheet.records().len(), 3);
        assert!(sheet.records()[1].is_blank());
        assert_eq!(sheet.records()[2].row(), 4);
        assert_eq!(sheet.records()[2].get("Monthly Budget"), &CellValue::Empty);
        Ok(())
    }
}
