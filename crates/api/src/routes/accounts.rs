//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use hearth_core::ledger::AccountType;
use hearth_db::{
    entities::accounts,
    repositories::{AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).patch(update_account).delete(delete_account),
        )
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Account name.
    pub name: String,
    /// Account type: cash, liability, debt, investment, `other_asset`.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Currency code; the ledger default when omitted.
    pub currency: Option<String>,
    /// Whether the account is active (default: true).
    pub is_active: Option<bool>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Currency code.
    pub currency: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            ledger_id: model.ledger_id,
            name: model.name,
            account_type: model.account_type.into(),
            currency: model.currency,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// GET `/accounts` - List live accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;
    let filter = AccountFilter {
        account_type: query
            .account_type
            .as_deref()
            .map(str::parse::<AccountType>)
            .transpose()?,
        is_active: query.is_active,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let accounts = repo.list_accounts(ledger_id, filter).await?;

    let data: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(payload.ledger_id)?;
    let account_type: AccountType = payload.account_type.parse()?;
    let currency = payload
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.ledger.default_currency.clone());

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .create_account(CreateAccountInput {
            ledger_id,
            name: payload.name,
            account_type,
            currency,
            is_active: payload.is_active.unwrap_or(true),
        })
        .await?;

    info!(account_id = account.id, ledger_id, "Account created");
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET `/accounts/{id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.find_account(id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// PATCH `/accounts/{id}` - Partially update an account.
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = UpdateAccountInput {
        name: payload.name,
        account_type: payload
            .account_type
            .as_deref()
            .map(str::parse::<AccountType>)
            .transpose()?,
        currency: payload.currency,
        is_active: payload.is_active,
    };

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.update_account(id, input).await?;

    info!(account_id = id, "Account updated");
    Ok(Json(AccountResponse::from(account)))
}

/// DELETE `/accounts/{id}` - Soft-delete an account.
async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    repo.delete_account(id).await?;

    info!(account_id = id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
