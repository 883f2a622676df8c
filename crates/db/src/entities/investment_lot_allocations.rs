//! `SeaORM` Entity for investment_lot_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_lot_allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub buy_lot_id: i64,
    pub sale_id: i64,
    #[sea_orm(column_type = "Decimal(Some((24, 8)))")]
    pub quantity: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investment_lots::Entity",
        from = "Column::BuyLotId",
        to = "super::investment_lots::Column::Id"
    )]
    InvestmentLots,
    #[sea_orm(
        belongs_to = "super::investment_sales::Entity",
        from = "Column::SaleId",
        to = "super::investment_sales::Column::Id"
    )]
    InvestmentSales,
}

impl Related<super::investment_lots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentLots.def()
    }
}

impl Related<super::investment_sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentSales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
