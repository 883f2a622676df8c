//! Investment lot accounting.
//!
//! This module provides:
//! - Buy pricing and cost basis derivation
//! - Sale allocation planning against locked lots
//! - Lot status and security resolution rules

pub mod lots;
pub mod types;

#[cfg(test)]
mod lots_props;

pub use lots::{
    AMOUNT_SCALE, QUANTITY_EPSILON, aggregate_allocations, check_editable, check_sale_terms,
    normalize_ticker, plan_sale, price_buy, reconcile_security, select_security,
};
pub use types::{
    AllocationRequest, BuyAmounts, LotState, LotStatus, PlannedAllocation, SalePlan,
    SecurityAction, SecuritySelector,
};
