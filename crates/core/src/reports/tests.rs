//! Tests for balance sheet assembly.

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::ReportService;
use super::types::{AccountPosition, BalanceGroup};

fn position(id: i64, account_type: &str, snapshot: Option<Decimal>, delta: Decimal) -> AccountPosition {
    AccountPosition {
        id,
        name: format!("Account {id}"),
        account_type: account_type.to_string(),
        currency: "CNY".to_string(),
        is_active: true,
        snapshot_amount: snapshot,
        delta,
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

#[rstest]
#[case("cash", BalanceGroup::Asset)]
#[case("investment", BalanceGroup::Asset)]
#[case("other_asset", BalanceGroup::Asset)]
#[case("debt", BalanceGroup::Asset)]
#[case("liability", BalanceGroup::Liability)]
#[case("crypto", BalanceGroup::Other)]
fn test_classify(#[case] account_type: &str, #[case] expected: BalanceGroup) {
    assert_eq!(ReportService::classify(account_type), expected);
}

#[test]
fn test_snapshot_plus_later_lines() {
    let report = ReportService::generate_balance_sheet(
        1,
        as_of(),
        vec![position(1, "cash", Some(dec!(1000)), dec!(200))],
    );

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].accounts[0].balance, dec!(1200));
    assert_eq!(report.totals.assets, dec!(1200));
    assert_eq!(report.totals.net_worth, dec!(1200));
}

#[test]
fn test_no_snapshot_uses_lines_only() {
    assert_eq!(ReportService::account_balance(None, dec!(-35.5)), dec!(-35.5));
}

#[test]
fn test_groups_ordered_and_totals() {
    let report = ReportService::generate_balance_sheet(
        2,
        as_of(),
        vec![
            position(3, "liability", Some(dec!(300)), dec!(0)),
            position(2, "investment", None, dec!(500)),
            position(1, "cash", Some(dec!(100)), dec!(0)),
        ],
    );

    let keys: Vec<&str> = report.groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["asset", "liability"]);
    assert_eq!(report.groups[0].label, "Assets");
    assert_eq!(
        report.groups[0].accounts.iter().map(|a| a.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(report.totals.assets, dec!(600));
    assert_eq!(report.totals.liabilities, dec!(300));
    assert_eq!(report.totals.net_worth, dec!(300));
    assert_eq!(report.ledger_id, 2);
}

#[test]
fn test_empty_ledger() {
    let report = ReportService::generate_balance_sheet(1, as_of(), vec![]);
    assert!(report.groups.is_empty());
    assert_eq!(report.totals.net_worth, Decimal::ZERO);
}

#[test]
fn test_serialized_account_uses_type_key() {
    let report = ReportService::generate_balance_sheet(
        1,
        as_of(),
        vec![position(1, "debt", None, dec!(10))],
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["groups"][0]["accounts"][0]["type"], "debt");
    assert_eq!(json["as_of"], "2024-01-31");
}

proptest! {
    /// Net worth always equals assets minus liabilities, and every group
    /// total equals the sum of its accounts.
    #[test]
    fn prop_totals_consistent(
        rows in proptest::collection::vec((0usize..3, -1_000_000i64..1_000_000i64), 0..20),
    ) {
        let types = ["cash", "liability", "debt"];
        let positions: Vec<AccountPosition> = rows
            .iter()
            .enumerate()
            .map(|(i, (t, cents))| {
                position(i64::try_from(i).unwrap(), types[*t], None, Decimal::new(*cents, 2))
            })
            .collect();

        let report = ReportService::generate_balance_sheet(1, as_of(), positions);

        prop_assert_eq!(report.totals.net_worth, report.totals.assets - report.totals.liabilities);
        for group in &report.groups {
            let sum: Decimal = group.accounts.iter().map(|a| a.balance).sum();
            prop_assert_eq!(group.total, sum);
        }
    }
}
