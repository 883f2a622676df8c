//! Ledger service for event validation.
//!
//! Checks an economic event against the accounts and categories it touches
//! and returns the lines to persist. Lookups are passed in as closures so the
//! caller decides how rows are loaded.

use super::error::LedgerError;
use super::event::EconomicEvent;
use super::types::{AccountInfo, AccountRole, AccountType, CategoryInfo, LineDraft};
use super::validation;

/// Ledger service for event validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates an event and builds its lines.
    ///
    /// Rules per variant:
    /// - Entry: active account, income/expense category, amount sign matches kind
    /// - Transfer: two distinct active cash accounts, positive amount
    /// - Buy/Sell: active cash account, active investment account, fee and tax
    ///   categories of expense kind when given
    ///
    /// # Errors
    ///
    /// Returns the first rule violated; nothing is built on failure.
    pub fn prepare<A, C>(
        event: &EconomicEvent,
        ledger_id: i64,
        account_lookup: A,
        category_lookup: C,
    ) -> Result<Vec<LineDraft>, LedgerError>
    where
        A: Fn(i64) -> Option<AccountInfo>,
        C: Fn(i64) -> Option<CategoryInfo>,
    {
        event.validate()?;

        let account = |id: i64,
                       role: AccountRole,
                       required: Option<AccountType>|
         -> Result<(), LedgerError> {
            let info = account_lookup(id).ok_or(LedgerError::AccountNotFound(role))?;
            validation::check_account(&info, ledger_id, role, required)
        };

        match event {
            EconomicEvent::Entry(entry) => {
                account(entry.account_id, AccountRole::Entry, None)?;
                let category =
                    category_lookup(entry.category_id).ok_or(LedgerError::CategoryNotFound)?;
                validation::check_entry_category(&category, ledger_id)?;
                validation::check_entry_amount(category.kind, entry.amount)?;
            }
            EconomicEvent::Transfer(transfer) => {
                account(transfer.from_account_id, AccountRole::From, Some(AccountType::Cash))?;
                account(transfer.to_account_id, AccountRole::To, Some(AccountType::Cash))?;
            }
            EconomicEvent::Buy(trade) | EconomicEvent::Sell(trade) => {
                account(trade.cash_account_id, AccountRole::Cash, None)?;
                account(
                    trade.investment_account_id,
                    AccountRole::Investment,
                    Some(AccountType::Investment),
                )?;
                for category_id in [trade.charges.fee_category_id, trade.charges.tax_category_id]
                    .into_iter()
                    .flatten()
                {
                    let category =
                        category_lookup(category_id).ok_or(LedgerError::CategoryNotFound)?;
                    validation::check_expense_category(&category, ledger_id)?;
                }
            }
        }

        Ok(event.lines())
    }
}
