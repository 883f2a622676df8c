//! `SeaORM` entity definitions.
//!
//! Every table carries a `deleted_at` tombstone. Reads go through
//! [`SoftDelete::find_live`] so deleted rows never leak into results.

pub mod account_snapshots;
pub mod accounts;
pub mod categories;
pub mod investment_lot_allocations;
pub mod investment_lots;
pub mod investment_sales;
pub mod sea_orm_active_enums;
pub mod securities;
pub mod transaction_lines;
pub mod transactions;

use sea_orm::{
    ColumnTrait, EntityTrait, PrimaryKeyTrait, QueryFilter, Select, UpdateMany,
    sea_query::{Expr, SimpleExpr},
};

/// Tombstone-aware access to an entity.
pub trait SoftDelete: EntityTrait {
    /// The `deleted_at` column.
    fn deleted_at() -> Self::Column;

    /// Selects rows that are not deleted.
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::deleted_at().is_null())
    }

    /// Selects a row by primary key if it is not deleted.
    fn find_live_by_id<T>(id: T) -> Select<Self>
    where
        T: Into<<Self::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        Self::find_by_id(id).filter(Self::deleted_at().is_null())
    }

    /// Update that tombstones live rows matching later filters.
    fn soft_delete_many() -> UpdateMany<Self> {
        Self::update_many()
            .col_expr(Self::deleted_at(), now())
            .filter(Self::deleted_at().is_null())
    }
}

fn now() -> SimpleExpr {
    Expr::current_timestamp().into()
}

macro_rules! soft_delete {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDelete for $module::Entity {
                fn deleted_at() -> Self::Column {
                    $module::Column::DeletedAt
                }
            }
        )+
    };
}

soft_delete!(
    accounts,
    categories,
    transactions,
    transaction_lines,
    securities,
    investment_lots,
    investment_sales,
    investment_lot_allocations,
    account_snapshots,
);
