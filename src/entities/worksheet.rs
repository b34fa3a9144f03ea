//! Worksheet entity - one tab of a spreadsheet (e.g. "Transactions").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Worksheet database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "worksheets")]
pub struct Model {
    /// Unique identifier for the worksheet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the spreadsheet this tab belongs to
    pub spreadsheet: String,
    /// Tab title, unique within a spreadsheet
    pub title: String,
}

/// Defines relationships between Worksheet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One worksheet has many cells
    #[sea_orm(has_many = "super::cell::Entity")]
    Cells,
}

impl Related<super::cell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
