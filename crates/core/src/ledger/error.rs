//! Ledger error types for validation and lookup failures.
//!
//! Messages are user facing. Callers branch on [`LedgerError::kind`], never
//! on the text.

use thiserror::Error;

use super::types::{AccountRole, AccountType};

/// Broad classification of a ledger error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or business rule violation.
    Validation,
    /// A referenced row is absent or soft-deleted.
    NotFound,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Input Errors ==========
    /// Ledger id must be positive.
    #[error("ledger_id must be positive")]
    InvalidLedgerId,

    /// Unknown account type.
    #[error("type must be one of: cash, liability, debt, investment, other_asset")]
    InvalidAccountType,

    /// Unknown category kind.
    #[error("kind must be one of: income, expense, transfer, investment")]
    InvalidCategoryKind,

    /// Filter kind outside income/expense.
    #[error("kind must be income or expense")]
    InvalidEntryKindFilter,

    /// Lot status filter outside open/closed.
    #[error("status must be open or closed")]
    InvalidLotStatus,

    /// Name empty after trimming.
    #[error("name cannot be empty")]
    EmptyName,

    /// Partial update carried no fields.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// A required field was explicitly set to null.
    #[error("{0} cannot be null")]
    NullField(&'static str),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("{0} not found")]
    AccountNotFound(AccountRole),

    /// Account is inactive.
    #[error("{0} is inactive")]
    AccountInactive(AccountRole),

    /// Account has the wrong type for its role.
    #[error("{role} must be {expected} type")]
    AccountWrongType {
        /// Role in the operation.
        role: AccountRole,
        /// Type the role requires.
        expected: AccountType,
    },

    /// Transfer between one account.
    #[error("from_account_id and to_account_id must be different")]
    SameAccount,

    // ========== Category Errors ==========
    /// Category not found.
    #[error("category not found")]
    CategoryNotFound,

    /// Plain entries need an income or expense category.
    #[error("category must be income or expense")]
    CategoryNotEntryKind,

    /// Fee and tax lines need an expense category.
    #[error("category must be expense kind")]
    CategoryNotExpense,

    /// A category cannot be its own parent.
    #[error("parent_id cannot be self")]
    CategorySelfParent,

    /// Parent category not found in the ledger.
    #[error("parent category not found")]
    ParentCategoryNotFound,

    /// Parent and child kinds differ.
    #[error("parent kind must match category kind")]
    ParentKindMismatch,

    /// Category still has live children.
    #[error("category has child categories")]
    CategoryHasChildren,

    // ========== Amount Errors ==========
    /// Plain entry amount is zero.
    #[error("amount cannot be 0")]
    ZeroAmount,

    /// Income entry with a non-positive amount.
    #[error("income amount must be positive")]
    IncomeNotPositive,

    /// Expense entry with a non-negative amount.
    #[error("expense amount must be negative")]
    ExpenseNotNegative,

    /// Transfer amount must be positive.
    #[error("amount must be greater than 0")]
    NonPositiveAmount,

    /// Buy quantity or price not positive.
    #[error("quantity and price must be greater than 0")]
    NonPositiveQuantityOrPrice,

    /// Sale price not positive.
    #[error("price must be greater than 0")]
    NonPositivePrice,

    /// Fee or tax below zero.
    #[error("fee and tax cannot be negative")]
    NegativeFeeOrTax,

    /// Value or derived amount does not fit NUMERIC(24, 8).
    #[error("amount out of range")]
    AmountOutOfRange,

    /// Value carries more than eight decimal places.
    #[error("values allow at most 8 decimal places")]
    TooManyDecimals,

    // ========== Security Errors ==========
    /// Security not found.
    #[error("security not found")]
    SecurityNotFound,

    /// Buy without a security id needs ticker and name.
    #[error("security_ticker and security_name are required")]
    SecurityIdentityRequired,

    /// Ticker already registered by another ledger.
    #[error("security exists in another ledger")]
    SecurityInAnotherLedger,

    // ========== Lot Errors ==========
    /// Buy lot not found.
    #[error("buy lot not found")]
    LotNotFound,

    /// At least one requested lot is missing.
    #[error("one or more buy lots not found")]
    LotsNotFound,

    /// Buy lot has allocations and is frozen.
    #[error("buy lot already allocated, cannot edit")]
    LotAlreadyAllocated,

    /// Sale without allocations.
    #[error("allocations cannot be empty")]
    EmptyAllocations,

    /// Allocation quantity not positive.
    #[error("allocation quantity must be greater than 0")]
    NonPositiveAllocation,

    /// Lots of different securities in one sale.
    #[error("selected lots must share the same security_id")]
    MixedSecurities,

    /// Requested quantity above what is left in a lot.
    #[error("allocation quantity exceeds remaining lot quantity")]
    OverAllocation {
        /// Offending lot.
        lot_id: i64,
    },

    /// Sale quantity summed to zero.
    #[error("total quantity must be greater than 0")]
    NonPositiveTotalQuantity,

    // ========== Transaction Errors ==========
    /// Transaction not found.
    #[error("transaction not found")]
    TransactionNotFound,

    /// Line backing a lot is missing.
    #[error("transaction line not found")]
    TransactionLineNotFound,

    /// Edit of a transaction that is not a plain entry.
    #[error("only single-line income/expense transactions can be edited")]
    NotPlainEntry,

    /// Delete of a transaction referenced by a lot or sale.
    #[error("transaction belongs to an investment trade, cannot delete")]
    TransactionHasTrade,

    // ========== Snapshot Errors ==========
    /// Snapshot not found.
    #[error("snapshot not found")]
    SnapshotNotFound,
}

impl LedgerError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_)
            | Self::CategoryNotFound
            | Self::ParentCategoryNotFound
            | Self::SecurityNotFound
            | Self::LotNotFound
            | Self::LotsNotFound
            | Self::TransactionNotFound
            | Self::TransactionLineNotFound
            | Self::SnapshotNotFound => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    /// Returns true if the error reports a missing row.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLedgerId => "INVALID_LEDGER_ID",
            Self::InvalidAccountType => "INVALID_ACCOUNT_TYPE",
            Self::InvalidCategoryKind | Self::InvalidEntryKindFilter => "INVALID_CATEGORY_KIND",
            Self::InvalidLotStatus => "INVALID_LOT_STATUS",
            Self::EmptyName => "EMPTY_NAME",
            Self::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
            Self::NullField(_) => "NULL_FIELD",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountWrongType { .. } => "ACCOUNT_WRONG_TYPE",
            Self::SameAccount => "SAME_ACCOUNT",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::CategoryNotEntryKind | Self::CategoryNotExpense => "CATEGORY_KIND_MISMATCH",
            Self::CategorySelfParent => "CATEGORY_SELF_PARENT",
            Self::ParentCategoryNotFound => "PARENT_CATEGORY_NOT_FOUND",
            Self::ParentKindMismatch => "PARENT_KIND_MISMATCH",
            Self::CategoryHasChildren => "CATEGORY_HAS_CHILDREN",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::IncomeNotPositive | Self::ExpenseNotNegative => "AMOUNT_SIGN_MISMATCH",
            Self::NonPositiveAmount
            | Self::NonPositiveQuantityOrPrice
            | Self::NonPositivePrice
            | Self::NonPositiveAllocation
            | Self::NonPositiveTotalQuantity => "NON_POSITIVE_VALUE",
            Self::NegativeFeeOrTax => "NEGATIVE_FEE_OR_TAX",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::TooManyDecimals => "TOO_MANY_DECIMALS",
            Self::SecurityNotFound => "SECURITY_NOT_FOUND",
            Self::SecurityIdentityRequired => "SECURITY_IDENTITY_REQUIRED",
            Self::SecurityInAnotherLedger => "SECURITY_IN_ANOTHER_LEDGER",
            Self::LotNotFound | Self::LotsNotFound => "LOT_NOT_FOUND",
            Self::LotAlreadyAllocated => "LOT_ALREADY_ALLOCATED",
            Self::EmptyAllocations => "EMPTY_ALLOCATIONS",
            Self::MixedSecurities => "MIXED_SECURITIES",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            Self::TransactionLineNotFound => "TRANSACTION_LINE_NOT_FOUND",
            Self::NotPlainEntry => "NOT_PLAIN_ENTRY",
            Self::TransactionHasTrade => "TRANSACTION_HAS_TRADE",
            Self::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
        }
    }
}
