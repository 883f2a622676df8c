//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, NaiveDate};
use hearth_db::repositories::ReportRepository;
use serde::Deserialize;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/balance-sheet", get(get_balance_sheet))
}

/// Query parameters for the balance sheet.
#[derive(Debug, Deserialize)]
pub struct BalanceSheetQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Report date (defaults to today).
    pub as_of: Option<NaiveDate>,
}

/// GET `/reports/balance-sheet` - Balances grouped into assets and liabilities.
async fn get_balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<BalanceSheetQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;
    let as_of = query.as_of.unwrap_or_else(|| Local::now().date_naive());

    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.balance_sheet(ledger_id, as_of).await?;

    Ok(Json(report))
}
