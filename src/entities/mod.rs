//! Entity module - SeaORM entities for the spreadsheet emulation.
//! A spreadsheet is a named group of worksheets; each worksheet stores its
//! contents as sparse cells addressed by 1-based row and column numbers.

pub mod cell;
pub mod worksheet;

pub use cell::{Column as CellColumn, Entity as Cell, Model as CellModel};
pub use worksheet::{Column as WorksheetColumn, Entity as Worksheet, Model as WorksheetModel};
