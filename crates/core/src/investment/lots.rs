//! Lot accounting: buy pricing, sale planning and lot state.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{
    AllocationRequest, BuyAmounts, LotState, PlannedAllocation, SalePlan, SecurityAction,
    SecuritySelector,
};
use crate::ledger::LedgerError;
use crate::ledger::validation::{self, check_storable, checked};

/// Tolerance for remaining-quantity comparisons (1e-8).
pub const QUANTITY_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

pub use crate::ledger::validation::AMOUNT_SCALE;

/// Validates a buy and derives its amounts.
///
/// `cost_price` is always derived as `(gross + fee + tax) / quantity`.
/// Inputs must be storable as they are; derived amounts must fit storage.
pub fn price_buy(
    quantity: Decimal,
    price: Decimal,
    fee: Decimal,
    tax: Decimal,
) -> Result<BuyAmounts, LedgerError> {
    if quantity <= Decimal::ZERO || price <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveQuantityOrPrice);
    }
    check_storable(quantity)?;
    check_storable(price)?;
    validation::check_fee_and_tax(fee, tax)?;

    let gross_amount = checked(quantity.checked_mul(price))?.round_dp(AMOUNT_SCALE);
    if gross_amount.is_zero() {
        return Err(LedgerError::AmountOutOfRange);
    }
    let cost_amount = checked(gross_amount.checked_add(fee).and_then(|v| v.checked_add(tax)))?;
    let cost_price = checked(cost_amount.checked_div(quantity))?.round_dp(AMOUNT_SCALE);

    Ok(BuyAmounts {
        gross_amount,
        cost_amount,
        cost_price,
    })
}

/// Validates the price and charges of a sale.
pub fn check_sale_terms(price: Decimal, fee: Decimal, tax: Decimal) -> Result<(), LedgerError> {
    if price <= Decimal::ZERO {
        return Err(LedgerError::NonPositivePrice);
    }
    check_storable(price)?;
    validation::check_fee_and_tax(fee, tax)
}

/// Sums requested quantities per lot, keyed in ascending lot id order.
///
/// Duplicate lot ids are merged. Every slice must be positive and
/// storable.
pub fn aggregate_allocations(
    requests: &[AllocationRequest],
) -> Result<BTreeMap<i64, Decimal>, LedgerError> {
    if requests.is_empty() {
        return Err(LedgerError::EmptyAllocations);
    }

    let mut by_lot = BTreeMap::new();
    for request in requests {
        if request.quantity <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAllocation);
        }
        check_storable(request.quantity)?;
        let total = by_lot.entry(request.buy_lot_id).or_insert(Decimal::ZERO);
        *total = checked(total.checked_add(request.quantity))?;
    }
    Ok(by_lot)
}

/// Plans a sale over locked lots.
///
/// `lots` must hold exactly the lots named in `requested`; a short list
/// means some were missing from the ledger. Lots are checked in ascending
/// id order and a lot may be over-drawn by at most [`QUANTITY_EPSILON`].
pub fn plan_sale(
    security_id: i64,
    price: Decimal,
    requested: &BTreeMap<i64, Decimal>,
    lots: &[LotState],
) -> Result<SalePlan, LedgerError> {
    let by_id: BTreeMap<i64, &LotState> = lots.iter().map(|lot| (lot.id, lot)).collect();
    if by_id.len() != requested.len() || requested.keys().any(|id| !by_id.contains_key(id)) {
        return Err(LedgerError::LotsNotFound);
    }

    let mut allocations = Vec::with_capacity(requested.len());
    let mut total_quantity = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for (lot_id, quantity) in requested {
        let lot = by_id[lot_id];
        if lot.security_id != security_id {
            return Err(LedgerError::MixedSecurities);
        }
        if *quantity > lot.remaining() + QUANTITY_EPSILON {
            return Err(LedgerError::OverAllocation { lot_id: *lot_id });
        }

        let cost = checked(quantity.checked_mul(lot.cost_price))?.round_dp(AMOUNT_SCALE);
        total_quantity = checked(total_quantity.checked_add(*quantity))?;
        total_cost = checked(total_cost.checked_add(cost))?;
        allocations.push(PlannedAllocation {
            buy_lot_id: *lot_id,
            quantity: *quantity,
            cost,
        });
    }

    if total_quantity <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveTotalQuantity);
    }

    let gross_amount = checked(total_quantity.checked_mul(price))?.round_dp(AMOUNT_SCALE);
    Ok(SalePlan {
        allocations,
        total_quantity,
        total_cost,
        gross_amount,
    })
}

/// Rejects edits of a lot that already backs a sale.
pub fn check_editable(allocated: Decimal) -> Result<(), LedgerError> {
    if allocated > Decimal::ZERO {
        return Err(LedgerError::LotAlreadyAllocated);
    }
    Ok(())
}

/// Upper-cases and trims a ticker.
#[must_use]
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Decides how a buy identifies its security.
///
/// A positive id wins; otherwise both ticker and name are required.
pub fn select_security(
    security_id: Option<i64>,
    ticker: &str,
    name: &str,
) -> Result<SecuritySelector, LedgerError> {
    if let Some(id) = security_id.filter(|id| *id > 0) {
        return Ok(SecuritySelector::Id(id));
    }

    let ticker = normalize_ticker(ticker);
    let name = name.trim();
    if ticker.is_empty() || name.is_empty() {
        return Err(LedgerError::SecurityIdentityRequired);
    }
    Ok(SecuritySelector::Ticker {
        ticker,
        name: name.to_string(),
    })
}

/// Decides what to do with a security found by ticker.
pub fn reconcile_security(
    existing_ledger_id: i64,
    existing_name: &str,
    ledger_id: i64,
    requested_name: &str,
) -> Result<SecurityAction, LedgerError> {
    if existing_ledger_id != ledger_id {
        return Err(LedgerError::SecurityInAnotherLedger);
    }
    if existing_name == requested_name {
        Ok(SecurityAction::Reuse)
    } else {
        Ok(SecurityAction::Rename(requested_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::LotStatus;
    use rust_decimal_macros::dec;

    fn lot(id: i64, security_id: i64, quantity: Decimal, allocated: Decimal) -> LotState {
        LotState {
            id,
            security_id,
            quantity,
            cost_price: dec!(100.5),
            allocated,
        }
    }

    #[test]
    fn test_price_buy_scenario() {
        let amounts = price_buy(dec!(10), dec!(100), dec!(5), dec!(0)).unwrap();
        assert_eq!(amounts.gross_amount, dec!(1000));
        assert_eq!(amounts.cost_amount, dec!(1005));
        assert_eq!(amounts.cost_price, dec!(100.5));
    }

    #[test]
    fn test_price_buy_rejects_bad_input() {
        assert_eq!(
            price_buy(dec!(0), dec!(1), dec!(0), dec!(0)),
            Err(LedgerError::NonPositiveQuantityOrPrice)
        );
        assert_eq!(
            price_buy(dec!(1), dec!(-1), dec!(0), dec!(0)),
            Err(LedgerError::NonPositiveQuantityOrPrice)
        );
        assert_eq!(
            price_buy(dec!(1), dec!(1), dec!(0), dec!(-1)),
            Err(LedgerError::NegativeFeeOrTax)
        );
    }

    #[test]
    fn test_price_buy_rejects_values_outside_storage() {
        let huge = dec!(100000000000000000000);
        assert_eq!(
            price_buy(huge, huge, dec!(0), dec!(0)),
            Err(LedgerError::AmountOutOfRange)
        );
        assert_eq!(
            price_buy(dec!(100000000), dec!(100000000000), dec!(0), dec!(0)),
            Err(LedgerError::AmountOutOfRange)
        );
        assert_eq!(
            price_buy(dec!(0.000000001), dec!(1), dec!(0), dec!(0)),
            Err(LedgerError::TooManyDecimals)
        );
        assert_eq!(
            price_buy(dec!(1.000000004), dec!(1), dec!(0), dec!(0)),
            Err(LedgerError::TooManyDecimals)
        );
        assert_eq!(
            price_buy(dec!(0.00000001), dec!(0.00000001), dec!(0), dec!(0)),
            Err(LedgerError::AmountOutOfRange)
        );
    }

    #[test]
    fn test_cost_price_rounds_to_storage_scale() {
        let amounts = price_buy(dec!(3), dec!(10), dec!(1), dec!(0)).unwrap();
        assert_eq!(amounts.cost_price, dec!(10.33333333));
    }

    #[test]
    fn test_aggregate_merges_duplicates_in_id_order() {
        let requests = vec![
            AllocationRequest { buy_lot_id: 9, quantity: dec!(1) },
            AllocationRequest { buy_lot_id: 3, quantity: dec!(2) },
            AllocationRequest { buy_lot_id: 9, quantity: dec!(0.5) },
        ];
        let by_lot = aggregate_allocations(&requests).unwrap();

        assert_eq!(by_lot.keys().copied().collect::<Vec<_>>(), vec![3, 9]);
        assert_eq!(by_lot[&9], dec!(1.5));
    }

    #[test]
    fn test_aggregate_rejects_empty_and_non_positive() {
        assert_eq!(aggregate_allocations(&[]), Err(LedgerError::EmptyAllocations));
        assert_eq!(
            aggregate_allocations(&[AllocationRequest { buy_lot_id: 1, quantity: dec!(0) }]),
            Err(LedgerError::NonPositiveAllocation)
        );
        assert_eq!(
            aggregate_allocations(&[AllocationRequest { buy_lot_id: 1, quantity: dec!(0.000000001) }]),
            Err(LedgerError::TooManyDecimals)
        );
    }

    #[test]
    fn test_sale_terms_reject_unstorable_price() {
        assert_eq!(
            check_sale_terms(dec!(1.123456789), dec!(0), dec!(0)),
            Err(LedgerError::TooManyDecimals)
        );
        assert_eq!(
            check_sale_terms(dec!(100000000000000000000), dec!(0), dec!(0)),
            Err(LedgerError::AmountOutOfRange)
        );
    }

    #[test]
    fn test_plan_sale_rejects_gross_beyond_storage() {
        let requested = BTreeMap::from([(1, dec!(1000000000))]);
        let lots = [lot(1, 7, dec!(1000000000), dec!(0))];
        assert_eq!(
            plan_sale(7, dec!(1000000000000), &requested, &lots),
            Err(LedgerError::AmountOutOfRange)
        );
    }

    #[test]
    fn test_plan_sale_scenario() {
        let requested = BTreeMap::from([(1, dec!(4))]);
        let plan = plan_sale(7, dec!(120), &requested, &[lot(1, 7, dec!(10), dec!(0))]).unwrap();

        assert_eq!(plan.total_quantity, dec!(4));
        assert_eq!(plan.gross_amount, dec!(480));
        assert_eq!(plan.total_cost, dec!(402));
        assert_eq!(
            plan.allocations,
            vec![PlannedAllocation { buy_lot_id: 1, quantity: dec!(4), cost: dec!(402) }]
        );
    }

    #[test]
    fn test_plan_sale_rejects_over_allocation() {
        let requested = BTreeMap::from([(1, dec!(7))]);
        let result = plan_sale(7, dec!(120), &requested, &[lot(1, 7, dec!(10), dec!(4))]);
        assert_eq!(result, Err(LedgerError::OverAllocation { lot_id: 1 }));
    }

    #[test]
    fn test_plan_sale_tolerates_epsilon() {
        let requested = BTreeMap::from([(1, dec!(6.000000005))]);
        assert!(plan_sale(7, dec!(1), &requested, &[lot(1, 7, dec!(10), dec!(4))]).is_ok());

        let requested = BTreeMap::from([(1, dec!(6.00000002))]);
        assert!(plan_sale(7, dec!(1), &requested, &[lot(1, 7, dec!(10), dec!(4))]).is_err());
    }

    #[test]
    fn test_plan_sale_rejects_mixed_securities() {
        let requested = BTreeMap::from([(1, dec!(1)), (2, dec!(1))]);
        let lots = [lot(1, 7, dec!(10), dec!(0)), lot(2, 8, dec!(10), dec!(0))];
        assert_eq!(
            plan_sale(7, dec!(1), &requested, &lots),
            Err(LedgerError::MixedSecurities)
        );
    }

    #[test]
    fn test_plan_sale_rejects_missing_lots() {
        let requested = BTreeMap::from([(1, dec!(1)), (2, dec!(1))]);
        assert_eq!(
            plan_sale(7, dec!(1), &requested, &[lot(1, 7, dec!(10), dec!(0))]),
            Err(LedgerError::LotsNotFound)
        );
    }

    #[test]
    fn test_lot_status() {
        assert_eq!(LotStatus::from_remaining(dec!(6)), LotStatus::Open);
        assert_eq!(LotStatus::from_remaining(dec!(0)), LotStatus::Closed);
        assert_eq!(LotStatus::from_remaining(dec!(-0.000000001)), LotStatus::Closed);
        assert_eq!("OPEN".parse::<LotStatus>(), Ok(LotStatus::Open));
        assert_eq!("sold".parse::<LotStatus>(), Err(LedgerError::InvalidLotStatus));
    }

    #[test]
    fn test_check_editable() {
        assert!(check_editable(dec!(0)).is_ok());
        assert_eq!(check_editable(dec!(0.1)), Err(LedgerError::LotAlreadyAllocated));
    }

    #[test]
    fn test_select_security() {
        assert_eq!(select_security(Some(5), "", ""), Ok(SecuritySelector::Id(5)));
        assert_eq!(
            select_security(None, "  aapl ", " Apple "),
            Ok(SecuritySelector::Ticker {
                ticker: "AAPL".to_string(),
                name: "Apple".to_string()
            })
        );
        assert_eq!(
            select_security(Some(0), "AAPL", "  "),
            Err(LedgerError::SecurityIdentityRequired)
        );
    }

    #[test]
    fn test_reconcile_security() {
        assert_eq!(reconcile_security(1, "Apple", 1, "Apple"), Ok(SecurityAction::Reuse));
        assert_eq!(
            reconcile_security(1, "Apple", 1, "Apple Inc"),
            Ok(SecurityAction::Rename("Apple Inc".to_string()))
        );
        assert_eq!(
            reconcile_security(2, "Apple", 1, "Apple"),
            Err(LedgerError::SecurityInAnotherLedger)
        );
    }
}
