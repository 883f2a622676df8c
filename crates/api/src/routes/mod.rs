//! API route definitions.

use axum::{Router, middleware};
use hearth_core::ledger::validation;

use crate::{AppState, error::ApiResult, middleware::auth_middleware};

pub mod account_snapshots;
pub mod accounts;
pub mod auth;
pub mod categories;
pub mod health;
pub mod investments;
pub mod reports;
pub mod transactions;
pub mod transfers;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(accounts::routes())
        .merge(account_snapshots::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .merge(transfers::routes())
        .merge(investments::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Applies the default ledger and rejects non-positive ids.
pub(crate) fn resolve_ledger_id(ledger_id: Option<i64>) -> ApiResult<i64> {
    Ok(validation::resolve_ledger_id(ledger_id)?)
}

#[cfg(test)]
mod tests;
