//! Unified error type for the finance tracker.
//!
//! Variants fall into two groups. Fatal errors (credentials, missing worksheets,
//! unreachable store, unparsable transaction dates) end the current interaction
//! with a blocking message. Recoverable errors are form-level problems that the
//! presentation layer reports as a warning without touching the store.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable `config.toml`
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// No usable store credentials/URL
    #[error("Store credentials not found: {message}")]
    Credentials {
        /// What is missing
        message: String,
    },

    /// Backing store failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A required worksheet does not exist in the selected spreadsheet
    #[error("Worksheet '{table}' not found in spreadsheet '{spreadsheet}'")]
    TableMissing {
        /// Spreadsheet that was opened
        spreadsheet: String,
        /// Worksheet title that was expected
        table: String,
    },

    /// A header the operation needs is absent from the worksheet
    #[error("Column '{column}' not found in worksheet '{table}'")]
    ColumnMissing {
        /// Worksheet title
        table: String,
        /// Header name
        column: String,
    },

    /// A sheet row number outside the addressable data rows
    #[error("Row {row} is not a data row")]
    RowOutOfRange {
        /// Offending row number
        row: i64,
    },

    /// A transaction row has a missing or unparsable date
    #[error("Row {row} of '{table}' has an unparsable date: '{value}'")]
    InvalidDate {
        /// Worksheet title
        table: String,
        /// 1-based sheet row
        row: u32,
        /// Raw cell content
        value: String,
    },

    /// A form amount that is not a non-negative decimal
    #[error("Invalid amount: '{input}' (must be a number of at least 0)")]
    InvalidAmount {
        /// Raw input
        input: String,
    },

    /// Form-level validation failure (empty names and the like)
    #[error("{message}")]
    Validation {
        /// Message shown to the user
        message: String,
    },

    /// Spreadsheet name outside the configured list
    #[error("Unknown spreadsheet: '{name}'")]
    UnknownSpreadsheet {
        /// Requested name
        name: String,
    },

    /// Requested month has no transactions in the selected range
    #[error("No transactions for {month} in the selected date range")]
    MonthNotInRange {
        /// Requested month key
        month: String,
    },

    /// CSV writer failure
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("Environment variable error: {0}")]
    #[allow(missing_docs)]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    #[allow(missing_docs)]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for form-level errors that should be shown as a warning while the
    /// interaction carries on. Everything else halts the interaction.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidAmount { .. }
                | Self::UnknownSpreadsheet { .. }
                | Self::MonthNotInRange { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
