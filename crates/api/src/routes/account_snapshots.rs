//! Account snapshot routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use hearth_db::{
    entities::account_snapshots,
    repositories::{CreateSnapshotInput, SnapshotRepository, UpdateSnapshotInput},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the snapshot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account-snapshots",
            get(list_snapshots).post(create_snapshot),
        )
        .route(
            "/account-snapshots/{id}",
            get(get_snapshot)
                .patch(update_snapshot)
                .delete(delete_snapshot),
        )
}

/// Query parameters for listing snapshots.
#[derive(Debug, Deserialize)]
pub struct ListSnapshotsQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Restrict to one account.
    pub account_id: Option<i64>,
}

/// Request body for recording a snapshot.
#[derive(Debug, Deserialize)]
pub struct CreateSnapshotRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Account the balance belongs to.
    pub account_id: i64,
    /// Checkpoint date.
    pub as_of: NaiveDate,
    /// Recorded balance.
    pub amount: Decimal,
    /// Optional note.
    #[serde(default)]
    pub note: String,
}

/// Request body for updating a snapshot.
#[derive(Debug, Deserialize)]
pub struct UpdateSnapshotRequest {
    /// New checkpoint date; null is rejected.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub as_of: Option<Option<NaiveDate>>,
    /// New balance; null is rejected.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub amount: Option<Option<Decimal>>,
    /// New note.
    pub note: Option<String>,
}

/// Response for a snapshot.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// Snapshot ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Account ID.
    pub account_id: i64,
    /// Checkpoint date.
    pub as_of: NaiveDate,
    /// Recorded balance.
    pub amount: Decimal,
    /// Note.
    pub note: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<account_snapshots::Model> for SnapshotResponse {
    fn from(model: account_snapshots::Model) -> Self {
        Self {
            id: model.id,
            ledger_id: model.ledger_id,
            account_id: model.account_id,
            as_of: model.as_of,
            amount: model.amount,
            note: model.note,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

async fn list_snapshots(
    State(state): State<AppState>,
    Query(query): Query<ListSnapshotsQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;

    let repo = SnapshotRepository::new((*state.db).clone());
    let snapshots = repo.list_snapshots(ledger_id, query.account_id).await?;

    let data: Vec<SnapshotResponse> = snapshots.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

async fn create_snapshot(
    State(state): State<AppState>,
    Json(payload): Json<CreateSnapshotRequest>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(payload.ledger_id)?;

    let repo = SnapshotRepository::new((*state.db).clone());
    let snapshot = repo
        .create_snapshot(CreateSnapshotInput {
            ledger_id,
            account_id: payload.account_id,
            as_of: payload.as_of,
            amount: payload.amount,
            note: payload.note,
        })
        .await?;

    info!(snapshot_id = snapshot.id, account_id = snapshot.account_id, "Snapshot recorded");
    Ok((StatusCode::CREATED, Json(SnapshotResponse::from(snapshot))))
}

async fn get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = SnapshotRepository::new((*state.db).clone());
    let snapshot = repo.find_snapshot(id).await?;
    Ok(Json(SnapshotResponse::from(snapshot)))
}

async fn update_snapshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSnapshotRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = SnapshotRepository::new((*state.db).clone());
    let snapshot = repo
        .update_snapshot(
            id,
            UpdateSnapshotInput {
                as_of: payload.as_of,
                amount: payload.amount,
                note: payload.note,
            },
        )
        .await?;

    info!(snapshot_id = id, "Snapshot updated");
    Ok(Json(SnapshotResponse::from(snapshot)))
}

async fn delete_snapshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = SnapshotRepository::new((*state.db).clone());
    repo.delete_snapshot(id).await?;

    info!(snapshot_id = id, "Snapshot deleted");
    Ok(StatusCode::NO_CONTENT)
}
