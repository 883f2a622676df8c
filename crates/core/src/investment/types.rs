//! Types for the investment lot engine.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// Derived amounts of a buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyAmounts {
    /// Quantity times trade price.
    pub gross_amount: Decimal,
    /// Gross plus fee and tax.
    pub cost_amount: Decimal,
    /// Cost amount per unit.
    pub cost_price: Decimal,
}

/// One requested slice of a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Lot to draw from.
    pub buy_lot_id: i64,
    /// Quantity taken from the lot.
    pub quantity: Decimal,
}

/// A lot as seen while planning a sale.
#[derive(Debug, Clone)]
pub struct LotState {
    /// Lot ID.
    pub id: i64,
    /// Security held.
    pub security_id: i64,
    /// Quantity bought.
    pub quantity: Decimal,
    /// Cost basis per unit.
    pub cost_price: Decimal,
    /// Quantity already consumed by live allocations.
    pub allocated: Decimal,
}

impl LotState {
    /// Quantity still available.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.quantity - self.allocated
    }
}

/// One allocation row of a planned sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAllocation {
    /// Lot drawn from.
    pub buy_lot_id: i64,
    /// Quantity taken.
    pub quantity: Decimal,
    /// Cost basis released.
    pub cost: Decimal,
}

/// Result of validating a sale against its lots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    /// Allocations in ascending lot id order.
    pub allocations: Vec<PlannedAllocation>,
    /// Sum of allocated quantities.
    pub total_quantity: Decimal,
    /// Sum of released cost basis.
    pub total_cost: Decimal,
    /// Total quantity times sale price.
    pub gross_amount: Decimal,
}

/// Open/closed state of a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotStatus {
    /// Some quantity remains.
    Open,
    /// Fully allocated.
    Closed,
}

impl LotStatus {
    /// Status for a remaining quantity.
    #[must_use]
    pub fn from_remaining(remaining: Decimal) -> Self {
        if remaining > Decimal::ZERO {
            Self::Open
        } else {
            Self::Closed
        }
    }

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LotStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(LedgerError::InvalidLotStatus),
        }
    }
}

/// How a buy names its security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecuritySelector {
    /// Existing security by id.
    Id(i64),
    /// Lookup or create by normalized ticker.
    Ticker {
        /// Upper-cased, trimmed ticker.
        ticker: String,
        /// Trimmed display name.
        name: String,
    },
}

/// What to do with a security found by ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityAction {
    /// Use as is.
    Reuse,
    /// Use after renaming to the given name.
    Rename(String),
}
