//! `SeaORM` active enums mirroring the Postgres enum types.

use hearth_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "debt")]
    Debt,
    #[sea_orm(string_value = "investment")]
    Investment,
    #[sea_orm(string_value = "other_asset")]
    OtherAsset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_kind")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "investment")]
    Investment,
}

impl From<ledger::AccountType> for AccountType {
    fn from(value: ledger::AccountType) -> Self {
        match value {
            ledger::AccountType::Cash => Self::Cash,
            ledger::AccountType::Liability => Self::Liability,
            ledger::AccountType::Debt => Self::Debt,
            ledger::AccountType::Investment => Self::Investment,
            ledger::AccountType::OtherAsset => Self::OtherAsset,
        }
    }
}

impl From<AccountType> for ledger::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Cash => Self::Cash,
            AccountType::Liability => Self::Liability,
            AccountType::Debt => Self::Debt,
            AccountType::Investment => Self::Investment,
            AccountType::OtherAsset => Self::OtherAsset,
        }
    }
}

impl From<ledger::CategoryKind> for CategoryKind {
    fn from(value: ledger::CategoryKind) -> Self {
        match value {
            ledger::CategoryKind::Income => Self::Income,
            ledger::CategoryKind::Expense => Self::Expense,
            ledger::CategoryKind::Transfer => Self::Transfer,
            ledger::CategoryKind::Investment => Self::Investment,
        }
    }
}

impl From<CategoryKind> for ledger::CategoryKind {
    fn from(value: CategoryKind) -> Self {
        match value {
            CategoryKind::Income => Self::Income,
            CategoryKind::Expense => Self::Expense,
            CategoryKind::Transfer => Self::Transfer,
            CategoryKind::Investment => Self::Investment,
        }
    }
}
