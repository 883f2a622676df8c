//! Investment routes: buys, sales and lot listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use hearth_core::{
    investment::{AllocationRequest, LotStatus},
    ledger::TradeCharges,
};
use hearth_db::repositories::{
    BuyInput, BuyResult, InvestmentRepository, LotFilter, LotView, SaleInput, SaleResult,
    SecurityRef, TransactionHeader,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the investment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/investments/lots", get(list_lots))
        .route("/investments/buys", post(create_buy))
        .route("/investments/buys/{id}", patch(update_buy))
        .route("/investments/sales", post(create_sale))
}

/// Query parameters for listing lots.
#[derive(Debug, Deserialize)]
pub struct ListLotsQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Filter by security.
    pub security_id: Option<i64>,
    /// Filter by computed status: open or closed.
    pub status: Option<String>,
}

/// Request body for recording or rewriting a buy.
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Trade date.
    pub occurred_on: NaiveDate,
    /// Existing security; takes precedence over ticker and name.
    pub security_id: Option<i64>,
    /// Ticker used to find or create the security.
    #[serde(default)]
    pub security_ticker: String,
    /// Display name of the security.
    #[serde(default)]
    pub security_name: String,
    /// Account paying for the buy.
    pub cash_account_id: i64,
    /// Account holding the lot.
    pub investment_account_id: i64,
    /// Units bought.
    pub quantity: Decimal,
    /// Trade price per unit.
    pub price: Decimal,
    /// Broker fee.
    #[serde(default)]
    pub fee: Decimal,
    /// Expense category of the fee line.
    pub fee_category_id: Option<i64>,
    /// Tax withheld.
    #[serde(default)]
    pub tax: Decimal,
    /// Expense category of the tax line.
    pub tax_category_id: Option<i64>,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// Request body for a sale.
#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Trade date.
    pub occurred_on: NaiveDate,
    /// Security sold; every lot must hold it.
    pub security_id: i64,
    /// Account receiving the proceeds.
    pub cash_account_id: i64,
    /// Account holding the lots.
    pub investment_account_id: i64,
    /// Sale price per unit.
    pub price: Decimal,
    /// Broker fee.
    #[serde(default)]
    pub fee: Decimal,
    /// Expense category of the fee line.
    pub fee_category_id: Option<i64>,
    /// Tax withheld.
    #[serde(default)]
    pub tax: Decimal,
    /// Expense category of the tax line.
    pub tax_category_id: Option<i64>,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Note.
    #[serde(default)]
    pub note: String,
    /// Quantities drawn from each lot.
    #[serde(default)]
    pub allocations: Vec<AllocationRequest>,
}

/// Response for a recorded buy.
#[derive(Debug, Serialize)]
pub struct BuyResponse {
    /// Transaction ID.
    pub transaction_id: i64,
    /// Lot ID.
    pub lot_id: i64,
    /// Security ID.
    pub security_id: i64,
    /// Units bought.
    pub quantity: Decimal,
    /// Trade price per unit.
    pub price: Decimal,
    /// Cost basis per unit.
    pub cost_price: Decimal,
    /// Quantity times price.
    pub gross_amount: Decimal,
    /// Gross plus fee and tax.
    pub cost_amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
}

impl From<BuyResult> for BuyResponse {
    fn from(result: BuyResult) -> Self {
        Self {
            transaction_id: result.transaction_id,
            lot_id: result.lot_id,
            security_id: result.security_id,
            quantity: result.quantity,
            price: result.price,
            cost_price: result.cost_price,
            gross_amount: result.gross_amount,
            cost_amount: result.cost_amount,
            fee: result.fee,
            tax: result.tax,
        }
    }
}

/// Response for a recorded sale.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    /// Transaction ID.
    pub transaction_id: i64,
    /// Sale ID.
    pub sale_id: i64,
    /// Units sold.
    pub quantity: Decimal,
    /// Sale price per unit.
    pub price: Decimal,
    /// Quantity times price.
    pub gross_amount: Decimal,
    /// Cost basis released.
    pub cost_amount: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Gross less fee, tax and cost.
    pub realized_gain: Decimal,
}

impl From<SaleResult> for SaleResponse {
    fn from(result: SaleResult) -> Self {
        Self {
            transaction_id: result.transaction_id,
            sale_id: result.sale_id,
            quantity: result.quantity,
            price: result.price,
            gross_amount: result.gross_amount,
            cost_amount: result.cost_amount,
            fee: result.fee,
            tax: result.tax,
            realized_gain: result.realized_gain,
        }
    }
}

/// A lot with its allocation state.
#[derive(Debug, Serialize)]
pub struct LotResponse {
    /// Lot ID.
    pub lot_id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Security ID.
    pub security_id: i64,
    /// Security ticker.
    pub security_ticker: String,
    /// Security name.
    pub security_name: String,
    /// Units bought.
    pub quantity: Decimal,
    /// Cost basis per unit.
    pub price: Decimal,
    /// Trade price per unit.
    pub trade_price: Decimal,
    /// Fee.
    pub fee: Decimal,
    /// Tax.
    pub tax: Decimal,
    /// Investment line of the buy.
    pub transaction_line_id: i64,
    /// Buy transaction.
    pub transaction_id: i64,
    /// Trade date.
    pub occurred_on: NaiveDate,
    /// Units consumed by sales.
    pub allocated_quantity: Decimal,
    /// Units still held.
    pub remaining_quantity: Decimal,
    /// Open or closed.
    pub status: LotStatus,
}

impl From<LotView> for LotResponse {
    fn from(lot: LotView) -> Self {
        Self {
            lot_id: lot.lot_id,
            ledger_id: lot.ledger_id,
            security_id: lot.security_id,
            security_ticker: lot.security_ticker,
            security_name: lot.security_name,
            quantity: lot.quantity,
            price: lot.price,
            trade_price: lot.trade_price,
            fee: lot.fee,
            tax: lot.tax,
            transaction_line_id: lot.transaction_line_id,
            transaction_id: lot.transaction_id,
            occurred_on: lot.occurred_on,
            allocated_quantity: lot.allocated_quantity,
            remaining_quantity: lot.remaining_quantity,
            status: lot.status,
        }
    }
}

impl BuyRequest {
    fn into_input(self, default_currency: &str) -> ApiResult<BuyInput> {
        Ok(BuyInput {
            header: TransactionHeader {
                ledger_id: resolve_ledger_id(self.ledger_id)?,
                occurred_on: self.occurred_on,
                description: self.description,
                note: self.note,
            },
            security: SecurityRef {
                security_id: self.security_id,
                ticker: self.security_ticker,
                name: self.security_name,
                currency: default_currency.to_string(),
            },
            cash_account_id: self.cash_account_id,
            investment_account_id: self.investment_account_id,
            quantity: self.quantity,
            price: self.price,
            charges: TradeCharges {
                fee: self.fee,
                fee_category_id: self.fee_category_id,
                tax: self.tax,
                tax_category_id: self.tax_category_id,
            },
        })
    }
}

/// GET `/investments/lots` - List lots with remaining quantities.
async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<ListLotsQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;
    let filter = LotFilter {
        security_id: query.security_id,
        status: query
            .status
            .as_deref()
            .map(str::parse::<LotStatus>)
            .transpose()?,
    };

    let repo = InvestmentRepository::new((*state.db).clone());
    let lots = repo.list_lots(ledger_id, filter).await?;

    let data: Vec<LotResponse> = lots.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "data": data })))
}

/// POST `/investments/buys` - Record a buy.
async fn create_buy(
    State(state): State<AppState>,
    Json(payload): Json<BuyRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input(&state.ledger.default_currency)?;

    let repo = InvestmentRepository::new((*state.db).clone());
    let result = repo.create_buy(input).await?;

    info!(
        transaction_id = result.transaction_id,
        lot_id = result.lot_id,
        security_id = result.security_id,
        "Buy recorded"
    );
    Ok((StatusCode::CREATED, Json(BuyResponse::from(result))))
}

/// PATCH `/investments/buys/{id}` - Rewrite a buy that has not been sold from.
async fn update_buy(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
    Json(payload): Json<BuyRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input(&state.ledger.default_currency)?;

    let repo = InvestmentRepository::new((*state.db).clone());
    let result = repo.update_buy(lot_id, input).await?;

    info!(
        transaction_id = result.transaction_id,
        lot_id,
        "Buy updated"
    );
    Ok(Json(BuyResponse::from(result)))
}

/// POST `/investments/sales` - Sell from one or more lots.
async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<SaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = SaleInput {
        header: TransactionHeader {
            ledger_id: resolve_ledger_id(payload.ledger_id)?,
            occurred_on: payload.occurred_on,
            description: payload.description,
            note: payload.note,
        },
        security_id: payload.security_id,
        cash_account_id: payload.cash_account_id,
        investment_account_id: payload.investment_account_id,
        price: payload.price,
        charges: TradeCharges {
            fee: payload.fee,
            fee_category_id: payload.fee_category_id,
            tax: payload.tax,
            tax_category_id: payload.tax_category_id,
        },
        allocations: payload.allocations,
    };

    let repo = InvestmentRepository::new((*state.db).clone());
    let result = repo.create_sale(input).await?;

    info!(
        transaction_id = result.transaction_id,
        sale_id = result.sale_id,
        realized_gain = %result.realized_gain,
        "Sale recorded"
    );
    Ok((StatusCode::CREATED, Json(SaleResponse::from(result))))
}
