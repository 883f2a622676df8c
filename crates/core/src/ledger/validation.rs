//! Business rule validation shared by every economic event.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountInfo, AccountRole, AccountType, CategoryInfo, CategoryKind};

/// Decimal places kept by stored amounts and quantities.
pub const AMOUNT_SCALE: u32 = 8;

/// Exclusive bound on the magnitude of a stored value (1e16).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Resolves an optional `ledger_id`, defaulting to ledger 1.
pub fn resolve_ledger_id(ledger_id: Option<i64>) -> Result<i64, LedgerError> {
    match ledger_id {
        None => Ok(hearth_shared::types::DEFAULT_LEDGER_ID),
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(LedgerError::InvalidLedgerId),
    }
}

/// Trims a name and rejects it when nothing is left.
pub fn normalize_name(name: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Checks that an account may take a line in the given role.
///
/// The account must live in `ledger_id`, be active and, when `required` is
/// set, have that type. An account of another ledger reads as not found.
pub fn check_account(
    account: &AccountInfo,
    ledger_id: i64,
    role: AccountRole,
    required: Option<AccountType>,
) -> Result<(), LedgerError> {
    if account.ledger_id != ledger_id {
        return Err(LedgerError::AccountNotFound(role));
    }
    if !account.is_active {
        return Err(LedgerError::AccountInactive(role));
    }
    if let Some(expected) = required {
        if account.account_type != expected {
            return Err(LedgerError::AccountWrongType { role, expected });
        }
    }
    Ok(())
}

/// Checks the category of a plain income/expense entry.
pub fn check_entry_category(category: &CategoryInfo, ledger_id: i64) -> Result<(), LedgerError> {
    if category.ledger_id != ledger_id {
        return Err(LedgerError::CategoryNotFound);
    }
    if !category.kind.is_entry_kind() {
        return Err(LedgerError::CategoryNotEntryKind);
    }
    Ok(())
}

/// Checks a fee or tax category.
pub fn check_expense_category(category: &CategoryInfo, ledger_id: i64) -> Result<(), LedgerError> {
    if category.ledger_id != ledger_id {
        return Err(LedgerError::CategoryNotFound);
    }
    if category.kind != CategoryKind::Expense {
        return Err(LedgerError::CategoryNotExpense);
    }
    Ok(())
}

/// Checks that an entry amount carries the sign of its category kind.
pub fn check_entry_amount(kind: CategoryKind, amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    match kind {
        CategoryKind::Income if amount < Decimal::ZERO => Err(LedgerError::IncomeNotPositive),
        CategoryKind::Expense if amount > Decimal::ZERO => Err(LedgerError::ExpenseNotNegative),
        CategoryKind::Income | CategoryKind::Expense => Ok(()),
        CategoryKind::Transfer | CategoryKind::Investment => Err(LedgerError::CategoryNotEntryKind),
    }
}

/// Checks fee and tax are not negative and fit storage.
pub fn check_fee_and_tax(fee: Decimal, tax: Decimal) -> Result<(), LedgerError> {
    if fee < Decimal::ZERO || tax < Decimal::ZERO {
        return Err(LedgerError::NegativeFeeOrTax);
    }
    check_storable(fee)?;
    check_storable(tax)?;
    Ok(())
}

/// Checks that a value is stored without truncation.
///
/// Trailing zeros do not count toward the scale.
pub fn check_storable(value: Decimal) -> Result<Decimal, LedgerError> {
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::TooManyDecimals);
    }
    fit_storage(value)
}

/// Checks the magnitude of a derived value.
pub fn fit_storage(value: Decimal) -> Result<Decimal, LedgerError> {
    if value.abs() >= MAX_AMOUNT {
        return Err(LedgerError::AmountOutOfRange);
    }
    Ok(value)
}

/// Unwraps a checked decimal operation.
pub fn checked(value: Option<Decimal>) -> Result<Decimal, LedgerError> {
    value.ok_or(LedgerError::AmountOutOfRange).and_then(fit_storage)
}
