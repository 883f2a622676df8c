//! Property-based tests for LedgerService.
//!
//! - Transfer lines always sum to zero
//! - Entry sign always follows the category kind
//! - A rejected event never yields lines

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::event::{EconomicEvent, EntryEvent, TransferEvent, net_amount};
use super::service::LedgerService;
use super::types::{AccountInfo, AccountType, CategoryInfo, CategoryKind};

/// Strategy to generate non-zero signed amounts (-10,000.00 to 10,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        (1i64..1_000_000i64).prop_map(|cents| Decimal::new(-cents, 2)),
    ]
}

fn kind_strategy() -> impl Strategy<Value = CategoryKind> {
    prop_oneof![Just(CategoryKind::Income), Just(CategoryKind::Expense)]
}

fn cash_account(id: i64) -> Option<AccountInfo> {
    Some(AccountInfo {
        id,
        ledger_id: 1,
        account_type: AccountType::Cash,
        is_active: true,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any positive amount and distinct accounts, the transfer lines net to zero.
    #[test]
    fn prop_transfer_nets_to_zero(
        cents in 1i64..100_000_000i64,
        from in 1i64..1000,
        to in 1i64..1000,
    ) {
        prop_assume!(from != to);
        let event = EconomicEvent::Transfer(TransferEvent {
            from_account_id: from,
            to_account_id: to,
            amount: Decimal::new(cents, 2),
        });

        let lines = LedgerService::prepare(&event, 1, cash_account, |_| None).unwrap();
        prop_assert_eq!(lines.len(), 2);
        prop_assert_eq!(net_amount(&lines), Decimal::ZERO);
    }

    /// An entry is accepted exactly when its sign matches the category kind.
    #[test]
    fn prop_entry_sign_matches_kind(amount in signed_amount(), kind in kind_strategy()) {
        let event = EconomicEvent::Entry(EntryEvent {
            account_id: 1,
            category_id: 2,
            amount,
        });
        let category = move |id| Some(CategoryInfo { id, ledger_id: 1, kind });

        let result = LedgerService::prepare(&event, 1, cash_account, category);
        let sign_ok = match kind {
            CategoryKind::Income => amount > Decimal::ZERO,
            _ => amount < Decimal::ZERO,
        };

        match result {
            Ok(lines) => {
                prop_assert!(sign_ok);
                prop_assert_eq!(net_amount(&lines), amount);
            }
            Err(err) => {
                prop_assert!(!sign_ok);
                prop_assert!(matches!(
                    err,
                    LedgerError::IncomeNotPositive | LedgerError::ExpenseNotNegative
                ));
            }
        }
    }

    /// Accounts from another ledger are never accepted.
    #[test]
    fn prop_foreign_ledger_rejected(ledger in 2i64..50) {
        let event = EconomicEvent::Transfer(TransferEvent {
            from_account_id: 1,
            to_account_id: 2,
            amount: Decimal::ONE,
        });

        let result = LedgerService::prepare(&event, ledger, cash_account, |_| None);
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_not_found());
    }
}
