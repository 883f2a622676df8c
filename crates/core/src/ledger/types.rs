//! Domain types for ledger operations.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Bank accounts, wallets, physical cash.
    Cash,
    /// Credit cards, loans owed.
    Liability,
    /// Money lent to others.
    Debt,
    /// Brokerage accounts holding lots.
    Investment,
    /// Property, vehicles and other holdings.
    OtherAsset,
}

impl AccountType {
    /// All account types in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::Liability,
        Self::Debt,
        Self::Investment,
        Self::OtherAsset,
    ];

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Liability => "liability",
            Self::Debt => "debt",
            Self::Investment => "investment",
            Self::OtherAsset => "other_asset",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    /// Parses a type name, ignoring surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or(LedgerError::InvalidAccountType)
    }
}

/// Category kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Movement between own accounts.
    Transfer,
    /// Investment related movements.
    Investment,
}

impl CategoryKind {
    /// All category kinds in declaration order.
    pub const ALL: [Self; 4] = [Self::Income, Self::Expense, Self::Transfer, Self::Investment];

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Investment => "investment",
        }
    }

    /// Returns true for kinds a plain entry may use.
    #[must_use]
    pub const fn is_entry_kind(&self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or(LedgerError::InvalidCategoryKind)
    }
}

/// Role an account plays in an operation, used to phrase errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// The single account of a plain entry.
    Entry,
    /// Source of a transfer.
    From,
    /// Destination of a transfer.
    To,
    /// Cash leg of a trade.
    Cash,
    /// Asset leg of a trade.
    Investment,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entry => "account",
            Self::From => "from account",
            Self::To => "to account",
            Self::Cash => "cash account",
            Self::Investment => "investment account",
        })
    }
}

/// Account data needed by validation.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// Account ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Account type.
    pub account_type: AccountType,
    /// Whether the account accepts new lines.
    pub is_active: bool,
}

/// Category data needed by validation.
#[derive(Debug, Clone)]
pub struct CategoryInfo {
    /// Category ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Category kind.
    pub kind: CategoryKind,
}

/// A line to be persisted under a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    /// Account moved.
    pub account_id: i64,
    /// Optional category.
    pub category_id: Option<i64>,
    /// Signed amount.
    pub amount: Decimal,
}

impl LineDraft {
    /// Creates a line without a category.
    #[must_use]
    pub const fn new(account_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            category_id: None,
            amount,
        }
    }

    /// Creates a line tagged with a category.
    #[must_use]
    pub const fn categorized(account_id: i64, category_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            category_id: Some(category_id),
            amount,
        }
    }
}
