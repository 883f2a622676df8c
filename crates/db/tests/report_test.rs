//! Integration tests for the balance sheet.

mod common;

use common::{connect, date, fixture, header};
use hearth_db::repositories::{
    CreateEntryInput, CreateSnapshotInput, ReportRepository, SnapshotRepository,
    TransactionRepository,
};
use rust_decimal_macros::dec;

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_snapshot_plus_later_lines() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;

    SnapshotRepository::new(db.clone())
        .create_snapshot(CreateSnapshotInput {
            ledger_id: f.ledger_id,
            account_id: f.cash_id,
            as_of: date(2024, 1, 1),
            amount: dec!(1000),
            note: String::new(),
        })
        .await
        .expect("snapshot");

    let transactions = TransactionRepository::new(db.clone());
    for (day, amount) in [(1, dec!(50)), (15, dec!(200))] {
        transactions
            .create_entry(CreateEntryInput {
                header: header(f.ledger_id, date(2024, 1, day)),
                account_id: f.cash_id,
                category_id: f.salary_id,
                amount,
            })
            .await
            .expect("entry");
    }
    transactions
        .create_entry(CreateEntryInput {
            header: header(f.ledger_id, date(2024, 2, 2)),
            account_id: f.cash_id,
            category_id: f.salary_id,
            amount: dec!(999),
        })
        .await
        .expect("later entry");

    let report = ReportRepository::new(db.clone())
        .balance_sheet(f.ledger_id, date(2024, 1, 31))
        .await
        .expect("report");

    let cash = report
        .groups
        .iter()
        .flat_map(|g| &g.accounts)
        .find(|a| a.id == f.cash_id)
        .expect("cash account in report");
    assert_eq!(cash.balance, dec!(1200));
    assert_eq!(report.totals.assets, dec!(1200));
    assert_eq!(report.totals.net_worth, dec!(1200));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_same_day_snapshots_are_summed() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let snapshots = SnapshotRepository::new(db.clone());

    for amount in [dec!(300), dec!(200)] {
        snapshots
            .create_snapshot(CreateSnapshotInput {
                ledger_id: f.ledger_id,
                account_id: f.cash_id,
                as_of: date(2024, 3, 1),
                amount,
                note: String::new(),
            })
            .await
            .expect("snapshot");
    }

    let report = ReportRepository::new(db.clone())
        .balance_sheet(f.ledger_id, date(2024, 3, 1))
        .await
        .expect("report");
    assert_eq!(report.totals.assets, dec!(500));
}
