//! Table store - the spreadsheet seen as three weakly-typed tables.
//!
//! Rows come back as header-keyed `Record`s of loosely typed `CellValue`s; the
//! normalizer in `core::normalize` turns them into entities. Writes either
//! append a full row or overwrite one cell addressed by sheet row and header.

/// Read cache with TTL and explicit invalidation
pub mod cache;
/// `SeaORM`-backed implementation of `TableStore`
pub mod sql;

use crate::errors::Result;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;

pub use cache::{CachedStore, TableCache};
pub use sql::SqlTableStore;

/// Header names used by the three worksheets.
pub mod columns {
    #![allow(missing_docs)]

    pub const DATE: &str = "Date";
    pub const CATEGORY: &str = "Category";
    pub const DESCRIPTION: &str = "Description";
    pub const AMOUNT: &str = "Amount";
    pub const PAYMENT_METHOD: &str = "Payment Method";
    pub const NOTES: &str = "Notes";
    pub const PAYER: &str = "Payer";
    pub const MONTHLY_BUDGET: &str = "Monthly Budget";
    pub const GOAL_NAME: &str = "Goal Name";
    pub const TARGET_AMOUNT: &str = "Target Amount";
    pub const CURRENT_SAVED: &str = "Current Saved";
}

/// The worksheets every spreadsheet must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Expense log, append-only
    Transactions,
    /// One monthly budget per category
    Budgets,
    /// One savings goal per name
    Goals,
}

impl Table {
    /// Every required table, in provisioning order.
    pub const ALL: [Self; 3] = [Self::Transactions, Self::Budgets, Self::Goals];

    /// Worksheet title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Budgets => "Budgets",
            Self::Goals => "Goals",
        }
    }

    /// Fixed header row, in write order.
    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        use columns::{
            AMOUNT, CATEGORY, CURRENT_SAVED, DATE, DESCRIPTION, GOAL_NAME, MONTHLY_BUDGET, NOTES,
            PAYER, PAYMENT_METHOD, TARGET_AMOUNT,
        };
        match self {
            Self::Transactions => &[
                DATE,
                CATEGORY,
                DESCRIPTION,
                AMOUNT,
                PAYMENT_METHOD,
                NOTES,
                PAYER,
            ],
            Self::Budgets => &[CATEGORY, MONTHLY_BUDGET],
            Self::Goals => &[GOAL_NAME, TARGET_AMOUNT, CURRENT_SAVED],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A single cell as the spreadsheet service reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Nothing entered
    Empty,
    /// Content that reads as a decimal literal
    Number(Decimal),
    /// Anything else, verbatim
    Text(String),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Interprets raw cell text the way a user-entered spreadsheet value is
    /// read back: empty stays empty, canonical decimal literals become numbers.
    ///
    /// Text is only promoted when the number prints back to the same text, so
    /// reading a cell never alters what a text column holds.
    #[must_use]
    pub fn numericise(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match Decimal::from_str(raw) {
            Ok(n) if n.to_string() == raw => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Raw text to persist for this value.
    #[must_use]
    pub fn to_raw(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        }
    }

    /// True when the cell holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(t) => t.trim().is_empty(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// One data row, keyed by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    row: u32,
    cells: BTreeMap<String, CellValue>,
}

impl Record {
    /// Creates a record for sheet row `row` (data rows start at 2).
    #[must_use]
    pub const fn new(row: u32, cells: BTreeMap<String, CellValue>) -> Self {
        Self { row, cells }
    }

    /// 1-based sheet row this record was read from, header included.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell under `column`; absent columns read as empty.
    #[must_use]
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// True when every cell in the row is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

/// A loaded worksheet: its header row and data records in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    table: Table,
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Sheet {
    /// Builds a sheet from already-keyed records.
    #[must_use]
    pub const fn new(table: Table, headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            table,
            headers,
            records,
        }
    }

    /// A sheet with the canonical headers and no data rows.
    #[cfg(test)]
    #[must_use]
    pub fn empty(table: Table) -> Self {
        Self::new(
            table,
            table.headers().iter().map(ToString::to_string).collect(),
            Vec::new(),
        )
    }

    /// Builds a sheet from positional rows; row `i` of the iterator is sheet row `i + 2`.
    #[cfg(test)]
    pub fn from_rows<I, R>(table: Table, headers: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = CellValue>,
    {
        let records = rows
            .into_iter()
            .zip(2u32..)
            .map(|(values, row)| {
                let cells = headers
                    .iter()
                    .map(ToString::to_string)
                    .zip(values)
                    .collect();
                Record::new(row, cells)
            })
            .collect();
        Self::new(
            table,
            headers.iter().map(ToString::to_string).collect(),
            records,
        )
    }

    /// Table this sheet was read from.
    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }

    /// Header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data records in sheet order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// True when the sheet has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Converts a 1-based column number to spreadsheet letters (1 → A, 28 → AB).
#[must_use]
pub fn column_letter(column: u32) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, so the addition stays within ASCII uppercase
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style address for logging, e.g. `B3`.
#[must_use]
pub fn a1_address(column: u32, row: u32) -> String {
    format!("{}{row}", column_letter(column))
}

/// Read/append/update access to the three tables of one spreadsheet.
///
/// Implementations do not cache; wrap them in `CachedStore` for the TTL cache
/// and write-through invalidation. Writes are last-write-wins: nothing guards
/// against another writer changing the same row between a read and a write.
pub trait TableStore: Send + Sync {
    /// Reads every data row of `table`.
    fn load(&self, table: Table) -> impl Future<Output = Result<Sheet>> + Send;

    /// Appends `values` as a new row, in header order. Returns the sheet row written.
    fn append(&self, table: Table, values: Vec<CellValue>)
    -> impl Future<Output = Result<u32>> + Send;

    /// Overwrites the cell at sheet row `row` under header `column`.
    fn write_cell(
        &self,
        table: Table,
        row: u32,
        column: &str,
        value: CellValue,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numericise() {
        assert_eq!(CellValue::numericise(""), CellValue::Empty);
        assert_eq!(
            CellValue::numericise("520.00"),
            CellValue::Number(Decimal::new(52000, 2))
        );
        assert_eq!(
            CellValue::numericise("2025-10-07"),
            CellValue::Text("2025-10-07".to_string())
        );
        assert_eq!(
            CellValue::numericise("$12"),
            CellValue::Text("$12".to_string())
        );
        assert_eq!(
            CellValue::numericise(" 42 "),
            CellValue::Text(" 42 ".to_string())
        );
    }

    #[test]
    fn test_number_round_trips_through_raw_text() {
        let value = CellValue::Number(Decimal::new(1999, 2));
        assert_eq!(value.to_raw(), "19.99");
        assert_eq!(CellValue::numericise(&value.to_raw()), value);
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(2), "B");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(28), "AB");
        assert_eq!(a1_address(2, 3), "B3");
    }

    #[test]
    fn test_record_missing_column_reads_empty() {
        let sheet = Sheet::from_rows(
            Table::Budgets,
            Table::Budgets.headers(),
            vec![vec![CellValue::from("Food")]],
        );
        let record = &sheet.records()[0];
        assert_eq!(record.row(), 2);
        assert_eq!(record.get("Category"), &CellValue::Text("Food".to_string()));
        assert_eq!(record.get("Monthly Budget"), &CellValue::Empty);
        assert_eq!(record.get("Nonexistent"), &CellValue::Empty);
    }

    #[test]
    fn test_blank_record() {
        let sheet = Sheet::from_rows(
            Table::Goals,
            Table::Goals.headers(),
            vec![vec![CellValue::Empty, CellValue::from("  ")]],
        );
        assert!(sheet.records()[0].is_blank());
    }

    #[test]
    fn test_table_headers() {
        assert_eq!(Table::Transactions.headers().len(), 7);
        assert_eq!(Table::Transactions.headers()[6], "Payer");
        assert_eq!(Table::Budgets.headers(), &["Category", "Monthly Budget"]);
        assert_eq!(
            Table::Goals.headers(),
            &["Goal Name", "Target Amount", "Current Saved"]
        );
    }
}
