//! Category routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use hearth_core::ledger::CategoryKind;
use hearth_db::{
    entities::categories,
    repositories::{CategoryRepository, CreateCategoryInput, UpdateCategoryInput},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::resolve_ledger_id;
use crate::{AppState, error::ApiResult};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            patch(update_category).delete(delete_category),
        )
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Filter by kind.
    pub kind: Option<String>,
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Ledger ID, defaults to 1.
    pub ledger_id: Option<i64>,
    /// Category name.
    pub name: String,
    /// Category kind.
    pub kind: String,
    /// Parent category; null or 0 for a root.
    pub parent_id: Option<i64>,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New parent; null or 0 clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<i64>>,
}

/// Response for a category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i64,
    /// Owning ledger.
    pub ledger_id: i64,
    /// Category name.
    pub name: String,
    /// Category kind.
    pub kind: CategoryKind,
    /// Parent category.
    pub parent_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            ledger_id: model.ledger_id,
            name: model.name,
            kind: model.kind.into(),
            parent_id: model.parent_id,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// GET `/categories` - List categories.
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(query.ledger_id)?;
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<CategoryKind>)
        .transpose()?;

    let repo = CategoryRepository::new((*state.db).clone());
    let categories = repo.list_categories(ledger_id, kind).await?;

    let data: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(Json(data))
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let ledger_id = resolve_ledger_id(payload.ledger_id)?;
    let kind: CategoryKind = payload.kind.parse()?;

    let repo = CategoryRepository::new((*state.db).clone());
    let category = repo
        .create_category(CreateCategoryInput {
            ledger_id,
            name: payload.name,
            kind,
            parent_id: payload.parent_id,
        })
        .await?;

    info!(category_id = category.id, ledger_id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// PATCH `/categories/{id}` - Partially update a category.
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = UpdateCategoryInput {
        name: payload.name,
        kind: payload
            .kind
            .as_deref()
            .map(str::parse::<CategoryKind>)
            .transpose()?,
        parent_id: payload.parent_id,
    };

    let repo = CategoryRepository::new((*state.db).clone());
    let category = repo.update_category(id, input).await?;

    info!(category_id = id, "Category updated");
    Ok(Json(CategoryResponse::from(category)))
}

/// DELETE `/categories/{id}` - Soft-delete a leaf category.
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = CategoryRepository::new((*state.db).clone());
    repo.delete_category(id).await?;

    info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
