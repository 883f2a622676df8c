//! Transaction repository for plain entries and transfers.
//!
//! Writes go through the shared posting path in [`super::posting`]; this
//! module adds the listing, editing and deletion of plain income/expense
//! entries.

use chrono::NaiveDate;
use hearth_core::ledger::{CategoryKind, EconomicEvent, EntryEvent, LedgerError, TransferEvent};
use hearth_shared::types::PageRequest;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{Alias, Expr, SimpleExpr},
};
use tracing::debug;

use super::error::RepoResult;
use super::posting::{self, TransactionHeader};
use crate::entities::{
    SoftDelete, accounts, categories, investment_lots, investment_sales, transaction_lines,
    transactions,
};

/// Input for a plain income or expense entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Transaction header.
    pub header: TransactionHeader,
    /// Account moved.
    pub account_id: i64,
    /// Income or expense category.
    pub category_id: i64,
    /// Signed amount.
    pub amount: Decimal,
}

/// Input for a transfer between cash accounts.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Transaction header.
    pub header: TransactionHeader,
    /// Account debited.
    pub from_account_id: i64,
    /// Account credited.
    pub to_account_id: i64,
    /// Positive amount.
    pub amount: Decimal,
}

/// Partial update of a plain entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateEntryInput {
    /// New date.
    pub occurred_on: Option<NaiveDate>,
    /// New account.
    pub account_id: Option<i64>,
    /// New category.
    pub category_id: Option<i64>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New note.
    pub note: Option<String>,
}

impl UpdateEntryInput {
    fn is_empty(&self) -> bool {
        self.occurred_on.is_none()
            && self.account_id.is_none()
            && self.category_id.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.note.is_none()
    }
}

/// Filters for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Only lines on this account.
    pub account_id: Option<i64>,
    /// Only lines in this category.
    pub category_id: Option<i64>,
    /// Only income or only expense lines.
    pub kind: Option<CategoryKind>,
    /// Earliest date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest date, inclusive.
    pub date_to: Option<NaiveDate>,
}

/// One income or expense line with its transaction header.
#[derive(Debug, Clone, FromQueryResult)]
pub struct EntryRow {
    /// Transaction ID.
    pub transaction_id: i64,
    /// Line ID.
    pub line_id: i64,
    /// Date of the transaction.
    pub occurred_on: NaiveDate,
    /// Account ID.
    pub account_id: i64,
    /// Account name.
    pub account_name: String,
    /// Category ID.
    pub category_id: i64,
    /// Category name.
    pub category_name: String,
    /// `income` or `expense`.
    pub category_kind: String,
    /// Signed amount.
    pub amount: Decimal,
    /// Transaction description.
    pub description: String,
    /// Transaction note.
    pub note: String,
    /// Creation time of the transaction.
    pub created_at: DateTimeWithTimeZone,
}

/// A line of a transaction with account and category names resolved.
#[derive(Debug, Clone, FromQueryResult)]
pub struct LineDetail {
    /// Line ID.
    pub id: i64,
    /// Account ID.
    pub account_id: i64,
    /// Account name.
    pub account_name: Option<String>,
    /// Category ID.
    pub category_id: Option<i64>,
    /// Category name.
    pub category_name: Option<String>,
    /// Category kind.
    pub category_kind: Option<String>,
    /// Signed amount.
    pub amount: Decimal,
}

/// A transaction with all of its live lines.
#[derive(Debug, Clone)]
pub struct TransactionDetail {
    /// Transaction row.
    pub transaction: transactions::Model,
    /// Lines ordered by id.
    pub lines: Vec<LineDetail>,
}

/// Result of a paginated listing.
#[derive(Debug, Clone)]
pub struct EntryPage {
    /// Rows of the requested page.
    pub rows: Vec<EntryRow>,
    /// Total rows across all pages.
    pub total: u64,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a plain entry and returns `(transaction_id, line_id)`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the account, category or amount are
    /// rejected; nothing is written in that case.
    pub async fn create_entry(&self, input: CreateEntryInput) -> RepoResult<(i64, i64)> {
        let event = EconomicEvent::Entry(EntryEvent {
            account_id: input.account_id,
            category_id: input.category_id,
            amount: input.amount,
        });
        event.validate()?;

        let txn = self.db.begin().await?;
        let posted = posting::post_event(&txn, &input.header, &event).await?;
        txn.commit().await?;

        let line_id = posted.lines.first().map_or(0, |line| line.id);
        Ok((posted.transaction.id, line_id))
    }

    /// Creates a transfer and returns the transaction id.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless both accounts are distinct, active
    /// cash accounts of the ledger and the amount is positive.
    pub async fn create_transfer(&self, input: CreateTransferInput) -> RepoResult<i64> {
        let event = EconomicEvent::Transfer(TransferEvent {
            from_account_id: input.from_account_id,
            to_account_id: input.to_account_id,
            amount: input.amount,
        });
        event.validate()?;

        let txn = self.db.begin().await?;
        let posted = posting::post_event(&txn, &input.header, &event).await?;
        txn.commit().await?;

        Ok(posted.transaction.id)
    }

    /// Lists income and expense lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        ledger_id: i64,
        filter: EntryFilter,
        page: &PageRequest,
    ) -> RepoResult<EntryPage> {
        let mut query = transaction_lines::Entity::find_live()
            .join(JoinType::InnerJoin, transaction_lines::Relation::Transactions.def())
            .join(JoinType::InnerJoin, transaction_lines::Relation::Accounts.def())
            .join(JoinType::InnerJoin, transaction_lines::Relation::Categories.def())
            .filter(transaction_lines::Column::LedgerId.eq(ledger_id))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(accounts::Column::DeletedAt.is_null())
            .filter(categories::Column::DeletedAt.is_null());

        query = match filter.kind {
            Some(kind) => query.filter(Expr::expr(category_kind_text()).eq(kind.as_str())),
            None => query.filter(Expr::expr(category_kind_text()).is_in([
                CategoryKind::Income.as_str(),
                CategoryKind::Expense.as_str(),
            ])),
        };
        if let Some(account_id) = filter.account_id {
            query = query.filter(transaction_lines::Column::AccountId.eq(account_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transaction_lines::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .select_only()
            .column_as(transaction_lines::Column::TransactionId, "transaction_id")
            .column_as(transaction_lines::Column::Id, "line_id")
            .column_as(transactions::Column::OccurredOn, "occurred_on")
            .column_as(transaction_lines::Column::AccountId, "account_id")
            .column_as(accounts::Column::Name, "account_name")
            .column_as(transaction_lines::Column::CategoryId, "category_id")
            .column_as(categories::Column::Name, "category_name")
            .column_as(category_kind_text(), "category_kind")
            .column_as(transaction_lines::Column::Amount, "amount")
            .column_as(transactions::Column::Description, "description")
            .column_as(transactions::Column::Note, "note")
            .column_as(transactions::Column::CreatedAt, "created_at")
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transaction_lines::Column::TransactionId)
            .order_by_desc(transaction_lines::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .into_model::<EntryRow>()
            .all(&self.db)
            .await?;

        Ok(EntryPage { rows, total })
    }

    /// Fetches a transaction with its lines, whatever event produced it.
    ///
    /// # Errors
    ///
    /// Returns `transaction not found` if it is missing or deleted.
    pub async fn get_transaction(&self, id: i64) -> RepoResult<TransactionDetail> {
        let transaction = find_transaction(&self.db, id).await?;

        let lines = transaction_lines::Entity::find_live()
            .join(JoinType::LeftJoin, transaction_lines::Relation::Accounts.def())
            .join(JoinType::LeftJoin, transaction_lines::Relation::Categories.def())
            .filter(transaction_lines::Column::TransactionId.eq(id))
            .select_only()
            .column_as(transaction_lines::Column::Id, "id")
            .column_as(transaction_lines::Column::AccountId, "account_id")
            .column_as(accounts::Column::Name, "account_name")
            .column_as(transaction_lines::Column::CategoryId, "category_id")
            .column_as(categories::Column::Name, "category_name")
            .column_as(category_kind_text(), "category_kind")
            .column_as(transaction_lines::Column::Amount, "amount")
            .order_by_asc(transaction_lines::Column::Id)
            .into_model::<LineDetail>()
            .all(&self.db)
            .await?;

        Ok(TransactionDetail { transaction, lines })
    }

    /// Edits a single-line income/expense entry.
    ///
    /// The merged entry is re-validated with the same rules as creation.
    ///
    /// # Errors
    ///
    /// Returns `only single-line income/expense transactions can be edited`
    /// for transfers, trades and multi-line transactions.
    pub async fn update_entry(&self, id: i64, input: UpdateEntryInput) -> RepoResult<()> {
        if input.is_empty() {
            return Err(LedgerError::NoFieldsToUpdate.into());
        }

        let txn = self.db.begin().await?;
        let transaction = find_transaction(&txn, id).await?;
        let line = find_plain_line(&txn, id).await?;

        let event = EconomicEvent::Entry(EntryEvent {
            account_id: input.account_id.unwrap_or(line.account_id),
            category_id: input
                .category_id
                .or(line.category_id)
                .ok_or(LedgerError::NotPlainEntry)?,
            amount: input.amount.unwrap_or(line.amount),
        });
        let drafts = posting::prepare_event(&txn, transaction.ledger_id, &event).await?;
        let draft = drafts.first().ok_or(LedgerError::NotPlainEntry)?;

        let mut header: transactions::ActiveModel = transaction.into();
        if let Some(occurred_on) = input.occurred_on {
            header.occurred_on = Set(occurred_on);
        }
        if let Some(description) = input.description {
            header.description = Set(description.trim().to_string());
        }
        if let Some(note) = input.note {
            header.note = Set(note.trim().to_string());
        }
        if header.is_changed() {
            header.update(&txn).await?;
        }

        let mut active: transaction_lines::ActiveModel = line.into();
        active.account_id = Set(draft.account_id);
        active.category_id = Set(draft.category_id);
        active.amount = Set(draft.amount);
        active.update(&txn).await?;

        txn.commit().await?;
        debug!(transaction_id = id, "entry updated");
        Ok(())
    }

    /// Soft-deletes a transaction and its lines together.
    ///
    /// # Errors
    ///
    /// Returns `transaction belongs to an investment trade, cannot delete`
    /// when a lot or sale hangs off one of its lines.
    pub async fn delete_transaction(&self, id: i64) -> RepoResult<()> {
        let txn = self.db.begin().await?;
        find_transaction(&txn, id).await?;

        let line_ids: Vec<i64> = transaction_lines::Entity::find_live()
            .filter(transaction_lines::Column::TransactionId.eq(id))
            .select_only()
            .column(transaction_lines::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        if has_trade(&txn, &line_ids).await? {
            return Err(LedgerError::TransactionHasTrade.into());
        }

        let removed = posting::delete_lines(&txn, id).await?;
        transactions::Entity::soft_delete_many()
            .filter(transactions::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        debug!(transaction_id = id, lines = removed, "transaction deleted");
        Ok(())
    }
}

fn category_kind_text() -> SimpleExpr {
    Expr::col((categories::Entity, categories::Column::Kind)).cast_as(Alias::new("text"))
}

pub(crate) async fn find_transaction<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> RepoResult<transactions::Model> {
    transactions::Entity::find_live_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::TransactionNotFound.into())
}

/// Returns the only line of a plain entry, or `NotPlainEntry`.
async fn find_plain_line<C: ConnectionTrait>(
    conn: &C,
    transaction_id: i64,
) -> RepoResult<transaction_lines::Model> {
    let mut lines = transaction_lines::Entity::find_live()
        .filter(transaction_lines::Column::TransactionId.eq(transaction_id))
        .all(conn)
        .await?;
    if lines.len() != 1 {
        return Err(LedgerError::NotPlainEntry.into());
    }
    let line = lines.remove(0);

    if has_trade(conn, &[line.id]).await? {
        return Err(LedgerError::NotPlainEntry.into());
    }

    let category_id = line.category_id.ok_or(LedgerError::NotPlainEntry)?;
    let category = categories::Entity::find_by_id(category_id)
        .one(conn)
        .await?
        .ok_or(LedgerError::NotPlainEntry)?;
    if !CategoryKind::from(category.kind).is_entry_kind() {
        return Err(LedgerError::NotPlainEntry.into());
    }

    Ok(line)
}

/// Whether a live lot or sale references any of the lines.
async fn has_trade<C: ConnectionTrait>(conn: &C, line_ids: &[i64]) -> RepoResult<bool> {
    if line_ids.is_empty() {
        return Ok(false);
    }

    let lots = investment_lots::Entity::find_live()
        .filter(investment_lots::Column::TransactionLineId.is_in(line_ids.iter().copied()))
        .count(conn)
        .await?;
    if lots > 0 {
        return Ok(true);
    }

    let sales = investment_sales::Entity::find_live()
        .filter(investment_sales::Column::TransactionLineId.is_in(line_ids.iter().copied()))
        .count(conn)
        .await?;
    Ok(sales > 0)
}
