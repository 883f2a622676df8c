//! `SeaORM` Entity for securities table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "securities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub ticker: String,
    pub name: String,
    pub currency: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment_lots::Entity")]
    InvestmentLots,
}

impl Related<super::investment_lots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentLots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
