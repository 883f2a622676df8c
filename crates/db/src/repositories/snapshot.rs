//! Account snapshot repository.
//!
//! Snapshots are manual balance checkpoints. The balance sheet uses the
//! latest one on or before the report date as a base.

use chrono::NaiveDate;
use hearth_core::ledger::{AccountRole, LedgerError, validation};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::error::RepoResult;
use crate::entities::{SoftDelete, account_snapshots, accounts};

/// Input for recording a snapshot.
#[derive(Debug, Clone)]
pub struct CreateSnapshotInput {
    /// Ledger ID.
    pub ledger_id: i64,
    /// Account the balance belongs to.
    pub account_id: i64,
    /// Date of the checkpoint.
    pub as_of: NaiveDate,
    /// Recorded balance.
    pub amount: Decimal,
    /// Free-form note.
    pub note: String,
}

/// Partial update of a snapshot.
///
/// `Some(None)` marks a field the caller explicitly set to null.
#[derive(Debug, Clone, Default)]
pub struct UpdateSnapshotInput {
    /// New checkpoint date.
    pub as_of: Option<Option<NaiveDate>>,
    /// New balance.
    pub amount: Option<Option<Decimal>>,
    /// New note.
    pub note: Option<String>,
}

/// Snapshot repository.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    /// Creates a new snapshot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a snapshot for a live account of the ledger.
    ///
    /// # Errors
    ///
    /// Returns `account not found` when the account is missing, deleted or
    /// belongs to another ledger.
    pub async fn create_snapshot(
        &self,
        input: CreateSnapshotInput,
    ) -> RepoResult<account_snapshots::Model> {
        validation::check_storable(input.amount)?;
        accounts::Entity::find_live_by_id(input.account_id)
            .filter(accounts::Column::LedgerId.eq(input.ledger_id))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::AccountNotFound(AccountRole::Entry))?;

        let snapshot = account_snapshots::ActiveModel {
            ledger_id: Set(input.ledger_id),
            account_id: Set(input.account_id),
            as_of: Set(input.as_of),
            amount: Set(input.amount),
            note: Set(input.note.trim().to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(snapshot_id = snapshot.id, account_id = input.account_id, "snapshot recorded");
        Ok(snapshot)
    }

    /// Lists snapshots, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_snapshots(
        &self,
        ledger_id: i64,
        account_id: Option<i64>,
    ) -> RepoResult<Vec<account_snapshots::Model>> {
        let mut query = account_snapshots::Entity::find_live()
            .filter(account_snapshots::Column::LedgerId.eq(ledger_id))
            .order_by_desc(account_snapshots::Column::AsOf)
            .order_by_desc(account_snapshots::Column::Id);

        if let Some(account_id) = account_id {
            query = query.filter(account_snapshots::Column::AccountId.eq(account_id));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a live snapshot by ID.
    ///
    /// # Errors
    ///
    /// Returns `snapshot not found` if it is missing or deleted.
    pub async fn find_snapshot(&self, id: i64) -> RepoResult<account_snapshots::Model> {
        account_snapshots::Entity::find_live_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::SnapshotNotFound.into())
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Rejects an empty update and explicit nulls for `as_of` and `amount`.
    pub async fn update_snapshot(
        &self,
        id: i64,
        input: UpdateSnapshotInput,
    ) -> RepoResult<account_snapshots::Model> {
        if input.as_of.is_none() && input.amount.is_none() && input.note.is_none() {
            return Err(LedgerError::NoFieldsToUpdate.into());
        }
        let as_of = input
            .as_of
            .map(|value| value.ok_or(LedgerError::NullField("as_of")))
            .transpose()?;
        let amount = input
            .amount
            .map(|value| value.ok_or(LedgerError::NullField("amount")))
            .transpose()?
            .map(validation::check_storable)
            .transpose()?;

        let snapshot = self.find_snapshot(id).await?;
        let mut active: account_snapshots::ActiveModel = snapshot.into();
        if let Some(as_of) = as_of {
            active.as_of = Set(as_of);
        }
        if let Some(amount) = amount {
            active.amount = Set(amount);
        }
        if let Some(note) = input.note {
            active.note = Set(note.trim().to_string());
        }

        let snapshot = active.update(&self.db).await?;
        debug!(snapshot_id = id, "snapshot updated");
        Ok(snapshot)
    }

    /// Soft-deletes a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `snapshot not found` if no live row was affected.
    pub async fn delete_snapshot(&self, id: i64) -> RepoResult<()> {
        let result = account_snapshots::Entity::soft_delete_many()
            .filter(account_snapshots::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::SnapshotNotFound.into());
        }
        debug!(snapshot_id = id, "snapshot deleted");
        Ok(())
    }
}
