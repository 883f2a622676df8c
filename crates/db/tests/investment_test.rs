//! Integration tests for buys, sales and lot state.
//!
//! Run against a live Postgres pointed to by `DATABASE_URL`:
//! `cargo test -p hearth-db -- --ignored`

mod common;

use common::{Fixture, connect, date, fixture, header, ticker};
use hearth_core::investment::{AllocationRequest, LotStatus};
use hearth_core::ledger::{LedgerError, TradeCharges};
use hearth_db::entities::{
    SoftDelete, investment_lot_allocations, investment_sales, securities, transactions,
};
use hearth_db::repositories::{
    BuyInput, BuyResult, InvestmentRepository, LotFilter, RepositoryError, SaleInput, SecurityRef,
    TransactionRepository,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

fn buy_input(f: &Fixture, quantity: Decimal, price: Decimal, fee: Decimal) -> BuyInput {
    BuyInput {
        header: header(f.ledger_id, date(2024, 1, 10)),
        security: SecurityRef {
            security_id: None,
            ticker: format!(" {} ", ticker(f.ledger_id).to_lowercase()),
            name: "Test Fund".to_string(),
            currency: "CNY".to_string(),
        },
        cash_account_id: f.cash_id,
        investment_account_id: f.broker_id,
        quantity,
        price,
        charges: TradeCharges {
            fee,
            fee_category_id: Some(f.fees_id),
            ..TradeCharges::default()
        },
    }
}

fn sale_input(f: &Fixture, buy: &BuyResult, quantity: Decimal, price: Decimal) -> SaleInput {
    SaleInput {
        header: header(f.ledger_id, date(2024, 2, 1)),
        security_id: buy.security_id,
        cash_account_id: f.cash_id,
        investment_account_id: f.broker_id,
        price,
        charges: TradeCharges::default(),
        allocations: vec![AllocationRequest {
            buy_lot_id: buy.lot_id,
            quantity,
        }],
    }
}

async fn sale_count(db: &DatabaseConnection, ledger_id: i64) -> u64 {
    investment_sales::Entity::find_live()
        .filter(investment_sales::Column::LedgerId.eq(ledger_id))
        .count(db)
        .await
        .expect("count sales")
}

async fn transaction_count(db: &DatabaseConnection, ledger_id: i64) -> u64 {
    transactions::Entity::find_live()
        .filter(transactions::Column::LedgerId.eq(ledger_id))
        .count(db)
        .await
        .expect("count transactions")
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_buy_derives_cost_basis_and_lines() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());

    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(5)))
        .await
        .expect("buy");

    assert_eq!(buy.gross_amount, dec!(1000));
    assert_eq!(buy.cost_amount, dec!(1005));
    assert_eq!(buy.cost_price, dec!(100.5));

    let detail = TransactionRepository::new(db.clone())
        .get_transaction(buy.transaction_id)
        .await
        .expect("transaction");
    let amounts: Vec<Decimal> = detail.lines.iter().map(|l| l.amount).collect();
    assert_eq!(amounts, vec![dec!(-1000), dec!(-5), dec!(1005)]);
    assert_eq!(detail.lines[1].category_id, Some(f.fees_id));

    let lots = repo
        .list_lots(f.ledger_id, LotFilter::default())
        .await
        .expect("lots");
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].quantity, dec!(10));
    assert_eq!(lots[0].price, dec!(100.5));
    assert_eq!(lots[0].trade_price, dec!(100));
    assert_eq!(lots[0].fee, dec!(5));
    assert_eq!(lots[0].security_ticker, ticker(f.ledger_id));
    assert_eq!(lots[0].transaction_line_id, detail.lines[2].id);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_partial_sale_leaves_open_lot() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(5)))
        .await
        .expect("buy");

    let sale = repo
        .create_sale(sale_input(&f, &buy, dec!(4), dec!(120)))
        .await
        .expect("sale");

    assert_eq!(sale.gross_amount, dec!(480));
    assert_eq!(sale.cost_amount, dec!(402));
    assert_eq!(sale.realized_gain, dec!(78));

    let allocations = investment_lot_allocations::Entity::find_live()
        .filter(investment_lot_allocations::Column::SaleId.eq(sale.sale_id))
        .all(&db)
        .await
        .expect("allocations");
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].buy_lot_id, buy.lot_id);
    assert_eq!(allocations[0].quantity, dec!(4));

    let lots = repo
        .list_lots(f.ledger_id, LotFilter::default())
        .await
        .expect("lots");
    assert_eq!(lots[0].allocated_quantity, dec!(4));
    assert_eq!(lots[0].remaining_quantity, dec!(6));
    assert_eq!(lots[0].status, LotStatus::Open);

    let closed = repo
        .list_lots(
            f.ledger_id,
            LotFilter {
                status: Some(LotStatus::Closed),
                ..LotFilter::default()
            },
        )
        .await
        .expect("closed lots");
    assert!(closed.is_empty());
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_over_allocation_writes_nothing() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(5)))
        .await
        .expect("buy");
    repo.create_sale(sale_input(&f, &buy, dec!(4), dec!(120)))
        .await
        .expect("first sale");
    let transactions_before = transaction_count(&db, f.ledger_id).await;

    let err = repo
        .create_sale(sale_input(&f, &buy, dec!(7), dec!(120)))
        .await
        .expect_err("over-allocation must fail");

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::OverAllocation { lot_id }) if lot_id == buy.lot_id
    ));
    assert_eq!(sale_count(&db, f.ledger_id).await, 1);
    assert_eq!(transaction_count(&db, f.ledger_id).await, transactions_before);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_allocated_lot_cannot_be_edited() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(5)))
        .await
        .expect("buy");
    repo.create_sale(sale_input(&f, &buy, dec!(1), dec!(110)))
        .await
        .expect("sale");

    let err = repo
        .update_buy(buy.lot_id, buy_input(&f, dec!(20), dec!(90), dec!(0)))
        .await
        .expect_err("edit must fail");
    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::LotAlreadyAllocated)
    ));

    let lots = repo
        .list_lots(f.ledger_id, LotFilter::default())
        .await
        .expect("lots");
    assert_eq!(lots[0].quantity, dec!(10));
    assert_eq!(lots[0].price, dec!(100.5));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_edit_buy_replaces_lines() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(5)))
        .await
        .expect("buy");

    let edited = repo
        .update_buy(buy.lot_id, buy_input(&f, dec!(20), dec!(50), dec!(0)))
        .await
        .expect("edit");
    assert_eq!(edited.transaction_id, buy.transaction_id);
    assert_eq!(edited.cost_price, dec!(50));

    let detail = TransactionRepository::new(db.clone())
        .get_transaction(buy.transaction_id)
        .await
        .expect("transaction");
    let amounts: Vec<Decimal> = detail.lines.iter().map(|l| l.amount).collect();
    assert_eq!(amounts.len(), 2);
    assert!(amounts.contains(&dec!(-1000)));
    assert!(amounts.contains(&dec!(1000)));
    assert_eq!(amounts.iter().copied().sum::<Decimal>(), Decimal::ZERO);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_mixed_securities_rejected() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let first = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(0)))
        .await
        .expect("first buy");

    let mut other = buy_input(&f, dec!(5), dec!(10), dec!(0));
    other.security.ticker = format!("{}X", ticker(f.ledger_id));
    let second = repo.create_buy(other).await.expect("second buy");
    assert_ne!(first.security_id, second.security_id);

    let mut sale = sale_input(&f, &first, dec!(1), dec!(100));
    sale.allocations.push(AllocationRequest {
        buy_lot_id: second.lot_id,
        quantity: dec!(1),
    });
    let err = repo.create_sale(sale).await.expect_err("mixed lots");

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::MixedSecurities)
    ));
    assert_eq!(sale_count(&db, f.ledger_id).await, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_existing_ticker_is_reused_and_renamed() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let first = repo
        .create_buy(buy_input(&f, dec!(1), dec!(10), dec!(0)))
        .await
        .expect("first buy");

    let mut renamed = buy_input(&f, dec!(2), dec!(10), dec!(0));
    renamed.security.name = "Renamed Fund".to_string();
    let second = repo.create_buy(renamed).await.expect("second buy");
    assert_eq!(first.security_id, second.security_id);

    let lots = repo
        .list_lots(f.ledger_id, LotFilter::default())
        .await
        .expect("lots");
    assert!(lots.iter().all(|lot| lot.security_name == "Renamed Fund"));
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_buy_with_income_fee_category_rolls_back() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());

    let mut input = buy_input(&f, dec!(10), dec!(100), dec!(5));
    input.charges.fee_category_id = Some(f.salary_id);
    let err = repo.create_buy(input).await.expect_err("fee category");

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::CategoryNotExpense)
    ));
    assert_eq!(transaction_count(&db, f.ledger_id).await, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_sale_of_deleted_security_rejected() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());
    let buy = repo
        .create_buy(buy_input(&f, dec!(10), dec!(100), dec!(0)))
        .await
        .expect("buy");
    securities::Entity::soft_delete_many()
        .filter(securities::Column::Id.eq(buy.security_id))
        .exec(&db)
        .await
        .expect("delete security");
    let transactions_before = transaction_count(&db, f.ledger_id).await;

    let err = repo
        .create_sale(sale_input(&f, &buy, dec!(1), dec!(120)))
        .await
        .expect_err("deleted security");

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::SecurityNotFound)
    ));
    assert_eq!(sale_count(&db, f.ledger_id).await, 0);
    assert_eq!(transaction_count(&db, f.ledger_id).await, transactions_before);
}

#[tokio::test]
#[ignore = "requires a Postgres database"]
async fn test_sub_scale_quantity_rejected_before_store() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let repo = InvestmentRepository::new(db.clone());

    let err = repo
        .create_buy(buy_input(&f, dec!(0.000000001), dec!(1), dec!(0)))
        .await
        .expect_err("sub-scale quantity");

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::TooManyDecimals)
    ));
    assert_eq!(transaction_count(&db, f.ledger_id).await, 0);
}
