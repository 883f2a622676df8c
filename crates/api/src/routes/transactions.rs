//! Income and expense entry routes.
//!
//! Creation, listing and editing are restricted to plain entries. Fetch and
//! delete work on any transaction; deletes are refused for trades.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use hearth_core::ledger::{CategoryKind, LedgerError};
use hearth_db::repositories::{
    CreateEntryInput, EntryFilter, EntryRow, LineDetail, TransactionHeader,
    TransactionRepository, UpdateEntryInput,
};
use hearth_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Filter by account.
    pub account_id: Option<i64>,
    /// Filter by category.
    pub category_id: Option<i64>,
    /// Filter by category kind: income or expense.
    pub kind: Option<String>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 200).
    pub page_size: Option<u32>,
}

/// Request body for creating an entry.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Booking date.
    pub occurred_on: NaiveDate,
    /// Account moved.
    pub account_id: i64,
    /// Income or expense category.
    pub category_id: i64,
    /// Signed amount: positive for income, negative for expense.
    pub amount: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// Request body for editing an entry.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New booking date.
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

/// One row of the entry list.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Transaction ID.
    pub transaction_id: i64,
    /// Line ID.
    pub line_id: i64,
    /// Booking date.
    pub occurred_on: NaiveDate,
    /// Account ID.
    pub account_id: i64,
    /// Account name.
    pub account_name: String,
    /// Category ID.
    pub category_id: i64,
    /// Category name.
    pub category_name: String,
    /// Category kind.
    pub category_kind: String,
    /// Signed amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Note.
    pub note: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<EntryRow> for EntryResponse {
    fn from(row: EntryRow) -> Self {
        Self {
            transaction_id: row.transaction_id,
            line_id: row.line_id,
            occurred_on: row.occurred_on,
            account_id: row.account_id,
            account_name: row.account_name,
            category_id: row.category_id,
            category_name: row.category_name,
            category_kind: row.category_kind,
            amount: row.amount,
            description: row.description,
            note: row.note,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

/// A line of a transaction detail.
#[derive(Debug, Serialize)]
pub struct LineResponse {
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

impl From<LineDetail> for LineResponse {
    fn from(line: LineDetail) -> Self {
        Self {
            id: line.id,
            account_id: line.account_id,
            account_name: line.account_name,
            category_id: line.category_id,
            category_name: line.category_name,
            category_kind: line.category_kind,
            amount: line.amount,
        }
    }
}

/// A transaction with its lines.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Booking date.
    pub occurred_on: NaiveDate,
    /// Description.
    pub description: String,
    /// Note.
    pub note: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Lines in id order.
    pub lines: Vec<LineResponse>,
}

/// Parses the `kind` filter, which only accepts entry kinds.
fn parse_entry_kind(kind: &str) -> Result<CategoryKind, LedgerError> {
    kind.parse::<CategoryKind>()
        .ok()
        .filter(CategoryKind::is_entry_kind)
        .ok_or(LedgerError::InvalidEntryKindFilter)
}

/// GET `/transactions` - List income and expense lines.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;
    let filter = EntryFilter {
        account_id: query.account_id,
        category_id: query.category_id,
        kind: query.kind.as_deref().map(parse_entry_kind).transpose()?,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = PageRequest::new(query.page, query.page_size);

    let repo = TransactionRepository::new((*state.db).clone());
    let result = repo.list_entries(ledger_id, filter, &page).await?;

    let data: Vec<EntryResponse> = result.rows.into_iter().map(Into::into).collect();
    Ok(Json(PageResponse::new(data, &page, result.total)))
}

/// POST `/transactions` - Record an income or expense entry.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(payload.ledger_id)?;

    let repo = TransactionRepository::new((*state.db).clone());
    let (transaction_id, line_id) = repo
        .create_entry(CreateEntryInput {
            header: TransactionHeader {
                ledger_id,
                occurred_on: payload.occurred_on,
                description: payload.description,
                note: payload.note,
            },
            account_id: payload.account_id,
            category_id: payload.category_id,
            amount: payload.amount,
        })
        .await?;

    info!(transaction_id, line_id, "Entry created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "transaction_id": transaction_id, "line_id": line_id })),
    ))
}

/// GET `/transactions/{id}` - Fetch a transaction with its lines.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    let detail = repo.get_transaction(id).await?;

    let transaction = detail.transaction;
    Ok(Json(TransactionResponse {
        id: transaction.id,
        ledger_id: transaction.ledger_id,
        occurred_on: transaction.occurred_on,
        description: transaction.description,
        note: transaction.note,
        created_at: transaction.created_at.to_rfc3339(),
        lines: detail.lines.into_iter().map(Into::into).collect(),
    }))
}

/// PATCH `/transactions/{id}` - Edit a plain entry.
async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    repo.update_entry(
        id,
        UpdateEntryInput {
            occurred_on: payload.occurred_on,
            account_id: payload.account_id,
            category_id: payload.category_id,
            amount: payload.amount,
            description: payload.description,
            note: payload.note,
        },
    )
    .await?;

    info!(transaction_id = id, "Entry updated");
    Ok(Json(json!({ "success": true })))
}

/// DELETE `/transactions/{id}` - Soft-delete a transaction and its lines.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = TransactionRepository::new((*state.db).clone());
    repo.delete_transaction(id).await?;

    info!(transaction_id = id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}
