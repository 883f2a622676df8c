//! Shared write path: one transaction row plus its lines.
//!
//! Callers run these inside an open `DatabaseTransaction`; nothing here
//! commits.

use std::collections::HashMap;

use chrono::NaiveDate;
use hearth_core::ledger::{
    AccountInfo, CategoryInfo, EconomicEvent, LedgerService, LineDraft,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use tracing::debug;

use super::error::RepoResult;
use crate::entities::{SoftDelete, accounts, categories, transaction_lines, transactions};

/// Header fields of a transaction.
#[derive(Debug, Clone)]
pub struct TransactionHeader {
    /// Ledger ID.
    pub ledger_id: i64,
    /// Date the event happened.
    pub occurred_on: NaiveDate,
    /// Short description.
    pub description: String,
    /// Free-form note.
    pub note: String,
}

/// A persisted transaction with its lines in posting order.
#[derive(Debug, Clone)]
pub struct Posted {
    /// Transaction row.
    pub transaction: transactions::Model,
    /// Line rows in the order they were built.
    pub lines: Vec<transaction_lines::Model>,
}

/// Loads live accounts by id.
pub(crate) async fn load_accounts<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i64>,
) -> Result<HashMap<i64, AccountInfo>, DbErr> {
    let rows = accounts::Entity::find_live()
        .filter(accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.iter().map(|a| (a.id, AccountInfo::from(a))).collect())
}

/// Loads live categories by id.
pub(crate) async fn load_categories<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = i64>,
) -> Result<HashMap<i64, CategoryInfo>, DbErr> {
    let rows = categories::Entity::find_live()
        .filter(categories::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.iter().map(|c| (c.id, CategoryInfo::from(c))).collect())
}

/// Validates an event against the rows it touches and returns its lines.
pub(crate) async fn prepare_event<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
    event: &EconomicEvent,
) -> RepoResult<Vec<LineDraft>> {
    let (account_ids, category_ids) = referenced_ids(event);
    let accounts = load_accounts(conn, account_ids).await?;
    let categories = load_categories(conn, category_ids).await?;

    let lines = LedgerService::prepare(
        event,
        ledger_id,
        |id| accounts.get(&id).cloned(),
        |id| categories.get(&id).cloned(),
    )?;
    Ok(lines)
}

fn referenced_ids(event: &EconomicEvent) -> (Vec<i64>, Vec<i64>) {
    match event {
        EconomicEvent::Entry(entry) => (vec![entry.account_id], vec![entry.category_id]),
        EconomicEvent::Transfer(transfer) => (
            vec![transfer.from_account_id, transfer.to_account_id],
            vec![],
        ),
        EconomicEvent::Buy(trade) | EconomicEvent::Sell(trade) => (
            vec![trade.cash_account_id, trade.investment_account_id],
            [trade.charges.fee_category_id, trade.charges.tax_category_id]
                .into_iter()
                .flatten()
                .collect(),
        ),
    }
}

/// Inserts the transaction row.
pub(crate) async fn insert_transaction<C: ConnectionTrait>(
    conn: &C,
    header: &TransactionHeader,
) -> Result<transactions::Model, DbErr> {
    transactions::ActiveModel {
        ledger_id: Set(header.ledger_id),
        occurred_on: Set(header.occurred_on),
        description: Set(header.description.trim().to_string()),
        note: Set(header.note.trim().to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Inserts lines under an existing transaction, keeping their order.
pub(crate) async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
    transaction_id: i64,
    lines: &[LineDraft],
) -> Result<Vec<transaction_lines::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = transaction_lines::ActiveModel {
            ledger_id: Set(ledger_id),
            transaction_id: Set(transaction_id),
            account_id: Set(line.account_id),
            category_id: Set(line.category_id),
            amount: Set(line.amount),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

/// Validates an event and writes its transaction and lines.
pub(crate) async fn post_event<C: ConnectionTrait>(
    conn: &C,
    header: &TransactionHeader,
    event: &EconomicEvent,
) -> RepoResult<Posted> {
    let drafts = prepare_event(conn, header.ledger_id, event).await?;
    let transaction = insert_transaction(conn, header).await?;
    let lines = insert_lines(conn, header.ledger_id, transaction.id, &drafts).await?;

    debug!(
        transaction_id = transaction.id,
        lines = lines.len(),
        "posted transaction"
    );
    Ok(Posted { transaction, lines })
}

/// Tombstones every live line of a transaction.
pub(crate) async fn delete_lines<C: ConnectionTrait>(
    conn: &C,
    transaction_id: i64,
) -> Result<u64, DbErr> {
    let result = transaction_lines::Entity::soft_delete_many()
        .filter(transaction_lines::Column::TransactionId.eq(transaction_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
