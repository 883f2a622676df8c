//! Account repository.

use hearth_core::ledger::{AccountRole, AccountType, LedgerError, validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::error::RepoResult;
use crate::entities::{SoftDelete, accounts, sea_orm_active_enums};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Ledger ID.
    pub ledger_id: i64,
    /// Display name, trimmed before storing.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Currency code, upper-cased before storing.
    pub currency: String,
    /// Whether the account accepts new lines.
    pub is_active: bool,
}

/// Input for updating an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New type.
    pub account_type: Option<AccountType>,
    /// New currency.
    pub currency: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl UpdateAccountInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account_type.is_none()
            && self.currency.is_none()
            && self.is_active.is_none()
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a database error.
    pub async fn create_account(&self, input: CreateAccountInput) -> RepoResult<accounts::Model> {
        let name = validation::normalize_name(&input.name)?;

        let account = accounts::ActiveModel {
            ledger_id: Set(input.ledger_id),
            name: Set(name),
            account_type: Set(input.account_type.into()),
            currency: Set(normalize_currency(&input.currency)),
            is_active: Set(input.is_active),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(account_id = account.id, "account created");
        Ok(account)
    }

    /// Lists live accounts of a ledger ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        ledger_id: i64,
        filter: AccountFilter,
    ) -> RepoResult<Vec<accounts::Model>> {
        let mut query = accounts::Entity::find_live()
            .filter(accounts::Column::LedgerId.eq(ledger_id))
            .order_by_asc(accounts::Column::Id);

        if let Some(account_type) = filter.account_type {
            query = query.filter(
                accounts::Column::AccountType.eq(sea_orm_active_enums::AccountType::from(account_type)),
            );
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a live account by ID.
    ///
    /// # Errors
    ///
    /// Returns `account not found` if the account is missing or deleted.
    pub async fn find_account(&self, id: i64) -> RepoResult<accounts::Model> {
        accounts::Entity::find_live_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(AccountRole::Entry).into())
    }

    /// Applies a partial update to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is to be updated, the name is empty, or
    /// the account is missing.
    pub async fn update_account(
        &self,
        id: i64,
        input: UpdateAccountInput,
    ) -> RepoResult<accounts::Model> {
        if input.is_empty() {
            return Err(LedgerError::NoFieldsToUpdate.into());
        }

        let account = self.find_account(id).await?;
        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(validation::normalize_name(&name)?);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(currency) = input.currency {
            active.currency = Set(normalize_currency(&currency));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        let account = active.update(&self.db).await?;
        debug!(account_id = id, "account updated");
        Ok(account)
    }

    /// Soft-deletes an account.
    ///
    /// # Errors
    ///
    /// Returns `account not found` if no live row was affected.
    pub async fn delete_account(&self, id: i64) -> RepoResult<()> {
        let result = accounts::Entity::soft_delete_many()
            .filter(accounts::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::AccountNotFound(AccountRole::Entry).into());
        }
        debug!(account_id = id, "account deleted");
        Ok(())
    }
}

fn normalize_currency(currency: &str) -> String {
    currency.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_emptiness() {
        assert!(UpdateAccountInput::default().is_empty());
        assert!(
            !UpdateAccountInput {
                is_active: Some(false),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency(" usd "), "USD");
    }
}
