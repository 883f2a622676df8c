//! `SeaORM` Entity for investment_lots table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_lots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub transaction_line_id: i64,
    pub security_id: i64,
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub quantity: Decimal,
    /// Cost basis per unit.
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub trade_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub tax: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction_lines::Entity",
        from = "Column::TransactionLineId",
        to = "super::transaction_lines::Column::Id"
    )]
    TransactionLines,
    #[sea_orm(
        belongs_to = "super::securities::Entity",
        from = "Column::SecurityId",
        to = "super::securities::Column::Id"
    )]
    Securities,
    #[sea_orm(has_many = "super::investment_lot_allocations::Entity")]
    Allocations,
}

impl Related<super::transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionLines.def()
    }
}

impl Related<super::securities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Securities.def()
    }
}

impl Related<super::investment_lot_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
