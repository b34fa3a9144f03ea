//! CSV export of one month's transactions.

use super::models::{MonthKey, Transaction};
use crate::{errors::Result, store::Table};
use chrono::NaiveTime;
use tracing::debug;

/// A rendered CSV file ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// `transactions_<YYYY-MM>.csv`
    pub file_name: String,
    /// UTF-8 CSV with a header row
    pub bytes: Vec<u8>,
}

/// File name for a month's export.
#[must_use]
pub fn export_file_name(month: MonthKey) -> String {
    format!("transactions_{month}.csv")
}

fn format_date(transaction: &Transaction) -> String {
    if transaction.date.time() == NaiveTime::MIN {
        transaction.date.format("%Y-%m-%d").to_string()
    } else {
        transaction.date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Writes `transactions` as CSV under the Transactions headers, in the given order.
///
/// # Errors
/// `Error::Export` if a record cannot be encoded.
pub fn export_month_csv(month: MonthKey, transactions: &[&Transaction]) -> Result<CsvExport> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Table::Transactions.headers())?;
    for t in transactions {
        let date = format_date(t);
        let amount = t.amount.to_string();
        writer.write_record([
            date.as_str(),
            t.category.as_str(),
            t.description.as_str(),
            amount.as_str(),
            t.payment_method.as_str(),
            t.notes.as_str(),
            t.payer.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    debug!("Exported {} transactions for {}", transactions.len(), month);

    Ok(CsvExport {
        file_name: export_file_name(month),
        bytes,
    })
}
