//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Budget commands
pub mod budgeting;

/// Expense entry command
pub mod entry;

/// General utility commands
pub mod general;

/// Dashboard and export commands
pub mod reports;

/// Savings goal commands
pub mod savings;

// Export commands
pub use budgeting::*;
pub use entry::*;
pub use general::*;
pub use reports::*;
pub use savings::*;
