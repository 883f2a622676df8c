//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance sheet grouping of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceGroup {
    /// Counted in assets.
    Asset,
    /// Counted in liabilities.
    Liability,
    /// Neither side.
    Other,
}

impl BalanceGroup {
    /// Stable key of the group.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Other => "other",
        }
    }

    /// Display label of the group.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Asset => "Assets",
            Self::Liability => "Liabilities",
            Self::Other => "Other",
        }
    }
}

/// Inputs for one account's balance.
#[derive(Debug, Clone)]
pub struct AccountPosition {
    /// Account ID.
    pub id: i64,
    /// Account name.
    pub name: String,
    /// Stored account type name.
    pub account_type: String,
    /// Currency code.
    pub currency: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Latest snapshot amount on or before the report date.
    pub snapshot_amount: Option<Decimal>,
    /// Sum of lines after the snapshot date up to the report date.
    pub delta: Decimal,
}

/// Account row of a balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetAccount {
    /// Account ID.
    pub id: i64,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Currency code.
    pub currency: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Balance on the report date.
    pub balance: Decimal,
}

/// Group of accounts on a balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetGroup {
    /// Group key.
    pub key: String,
    /// Group label.
    pub label: String,
    /// Sum of balances.
    pub total: Decimal,
    /// Accounts in the group, by id.
    pub accounts: Vec<BalanceSheetAccount>,
}

/// Balance sheet totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetTotals {
    /// Total assets.
    pub assets: Decimal,
    /// Total liabilities.
    pub liabilities: Decimal,
    /// Assets minus liabilities.
    pub net_worth: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Ledger reported on.
    pub ledger_id: i64,
    /// Report date.
    pub as_of: NaiveDate,
    /// Totals.
    pub totals: BalanceSheetTotals,
    /// Non-empty groups, asset first.
    pub groups: Vec<BalanceSheetGroup>,
}
