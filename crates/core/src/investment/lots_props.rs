//! Property-based tests for the lot engine.
//!
//! - Buy lines always net to zero
//! - Cost basis is derived from gross, fee and tax
//! - A sale never draws more than a lot holds (beyond the epsilon)
//! - Sale lines net to the realized gain

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::lots::{QUANTITY_EPSILON, aggregate_allocations, plan_sale, price_buy};
use super::types::{AllocationRequest, LotState};
use crate::ledger::{EconomicEvent, LedgerError, TradeCharges, TradeEvent, net_amount};

/// Strategy for quantities (0.0001 to 1,000.0000).
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy for prices (0.01 to 10,000.00).
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for fees and taxes (0.00 to 100.00).
fn charge() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn open_lot(id: i64, quantity: Decimal, allocated: Decimal) -> LotState {
    LotState {
        id,
        security_id: 1,
        quantity,
        cost_price: Decimal::new(1005, 1),
        allocated,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Buy lines: −gross − fee − tax + cost_amount = 0.
    #[test]
    fn prop_buy_lines_balance(
        qty in quantity(),
        px in price(),
        fee in charge(),
        tax in charge(),
    ) {
        let amounts = price_buy(qty, px, fee, tax).unwrap();
        let event = EconomicEvent::Buy(TradeEvent {
            cash_account_id: 1,
            investment_account_id: 2,
            gross_amount: amounts.gross_amount,
            cost_amount: amounts.cost_amount,
            charges: TradeCharges { fee, tax, ..TradeCharges::default() },
        });

        prop_assert_eq!(net_amount(&event.lines()), Decimal::ZERO);
        prop_assert_eq!(amounts.cost_amount, amounts.gross_amount + fee + tax);
    }

    /// cost_price × quantity reproduces cost_amount within rounding.
    #[test]
    fn prop_cost_price_is_derived(
        qty in quantity(),
        px in price(),
        fee in charge(),
    ) {
        let amounts = price_buy(qty, px, fee, Decimal::ZERO).unwrap();
        let rebuilt = amounts.cost_price * qty;
        let tolerance = qty * Decimal::new(1, 8);
        prop_assert!((rebuilt - amounts.cost_amount).abs() <= tolerance);
    }

    /// Any accepted plan leaves every lot within quantity + epsilon.
    #[test]
    fn prop_plan_never_over_allocates(
        lot_qty in quantity(),
        already in quantity(),
        want in quantity(),
    ) {
        prop_assume!(already <= lot_qty);
        let lot = open_lot(1, lot_qty, already);
        let requested = BTreeMap::from([(1, want)]);

        match plan_sale(1, Decimal::ONE, &requested, &[lot]) {
            Ok(plan) => {
                prop_assert!(already + plan.total_quantity <= lot_qty + QUANTITY_EPSILON);
            }
            Err(err) => {
                prop_assert_eq!(err, LedgerError::OverAllocation { lot_id: 1 });
                prop_assert!(already + want > lot_qty + QUANTITY_EPSILON);
            }
        }
    }

    /// Splitting a request across duplicate entries is the same as one entry.
    #[test]
    fn prop_duplicate_lots_are_summed(a in quantity(), b in quantity()) {
        let split = aggregate_allocations(&[
            AllocationRequest { buy_lot_id: 4, quantity: a },
            AllocationRequest { buy_lot_id: 4, quantity: b },
        ]).unwrap();
        prop_assert_eq!(split.len(), 1);
        prop_assert_eq!(split[&4], a + b);
    }

    /// Sale lines: gross − fee − tax − total_cost equals their sum.
    #[test]
    fn prop_sell_lines_net_to_gain(
        want in quantity(),
        px in price(),
        fee in charge(),
        tax in charge(),
    ) {
        let lot = open_lot(1, want, Decimal::ZERO);
        let plan = plan_sale(1, px, &BTreeMap::from([(1, want)]), &[lot]).unwrap();
        let event = EconomicEvent::Sell(TradeEvent {
            cash_account_id: 1,
            investment_account_id: 2,
            gross_amount: plan.gross_amount,
            cost_amount: plan.total_cost,
            charges: TradeCharges { fee, tax, ..TradeCharges::default() },
        });

        prop_assert_eq!(
            net_amount(&event.lines()),
            plan.gross_amount - fee - tax - plan.total_cost
        );
    }

    /// Lots of another security are always refused.
    #[test]
    fn prop_mixed_security_refused(want in quantity()) {
        let mut other = open_lot(2, want, Decimal::ZERO);
        other.security_id = 2;
        let lots = [open_lot(1, want, Decimal::ZERO), other];
        let requested = BTreeMap::from([(1, want), (2, want)]);

        prop_assert_eq!(
            plan_sale(1, Decimal::ONE, &requested, &lots),
            Err(LedgerError::MixedSecurities)
        );
    }
}
