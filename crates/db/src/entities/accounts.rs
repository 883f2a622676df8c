//! `SeaORM` Entity for accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_lines::Entity")]
    TransactionLines,
    #[sea_orm(has_many = "super::account_snapshots::Entity")]
    AccountSnapshots,
}

impl Related<super::transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionLines.def()
    }
}

impl Related<super::account_snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountSnapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for hearth_core::ledger::AccountInfo {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            ledger_id: model.ledger_id,
            account_type: model.account_type.into(),
            is_active: model.is_active,
        }
    }
}
