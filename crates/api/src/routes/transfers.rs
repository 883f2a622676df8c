//! Transfer routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::NaiveDate;
use hearth_db::repositories::{CreateTransferInput, TransactionHeader, TransactionRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Request body for a transfer between two cash accounts.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Booking date.
    pub occurred_on: NaiveDate,
    /// Source account.
    pub from_account_id: i64,
    /// Destination account.
    pub to_account_id: i64,
    /// Positive amount moved.
    pub amount: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// POST `/transfers` - Move money between two cash accounts.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransferRequest>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(payload.ledger_id)?;

    let repo = TransactionRepository::new((*state.db).clone());
    let transaction_id = repo
        .create_transfer(CreateTransferInput {
            header: TransactionHeader {
                ledger_id,
                occurred_on: payload.occurred_on,
                description: payload.description,
                note: payload.note,
            },
            from_account_id: payload.from_account_id,
            to_account_id: payload.to_account_id,
            amount: payload.amount,
        })
        .await?;

    info!(transaction_id, ledger_id, "Transfer created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "transaction_id": transaction_id })),
    ))
}
