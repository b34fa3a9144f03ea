//! Cell entity - a single non-structural value inside a worksheet.
//!
//! Values are stored as entered text. Row 1 holds the header names; data rows
//! start at row 2. Cells are sparse: a row exists as soon as any of its cells does.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cell database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cells")]
pub struct Model {
    /// Unique identifier for the cell
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Worksheet the cell belongs to
    pub worksheet_id: i64,
    /// 1-based row number (1 = header)
    pub row_number: i64,
    /// 1-based column number (1 = column A)
    pub column_number: i64,
    /// Raw cell content
    pub value: String,
}

/// Defines relationships between Cell and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cell belongs to one worksheet
    #[sea_orm(
        belongs_to = "super::worksheet::Entity",
        from = "Column::WorksheetId",
        to = "super::worksheet::Column::Id"
    )]
    Worksheet,
}

impl Related<super::worksheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worksheet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
