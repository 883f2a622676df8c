//! Category repository.
//!
//! Categories form a tree through `parent_id`. Parents are resolved one
//! lookup at a time and the rules live in `hearth_core::ledger::category`.

use hearth_core::ledger::{CategoryInfo, CategoryKind, LedgerError, category, validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use super::error::RepoResult;
use crate::entities::{SoftDelete, categories, sea_orm_active_enums};

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Ledger ID.
    pub ledger_id: i64,
    /// Display name.
    pub name: String,
    /// Category kind.
    pub kind: CategoryKind,
    /// Parent category; 0 means none.
    pub parent_id: Option<i64>,
}

/// Input for updating a category.
///
/// `parent_id` is `Some(None)` when the caller explicitly clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<CategoryKind>,
    /// New parent.
    pub parent_id: Option<Option<i64>>,
}

impl UpdateCategoryInput {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.parent_id.is_none()
    }
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category under an optional parent of the same kind.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or an unusable parent.
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> RepoResult<categories::Model> {
        let name = validation::normalize_name(&input.name)?;
        let parent_id = category::normalize_parent_id(input.parent_id);

        if let Some(parent_id) = parent_id {
            let parent = find_parent(&self.db, parent_id).await?;
            category::check_parent(None, input.ledger_id, input.kind, &parent)?;
        }

        let model = categories::ActiveModel {
            ledger_id: Set(input.ledger_id),
            name: Set(name),
            kind: Set(input.kind.into()),
            parent_id: Set(parent_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(category_id = model.id, "category created");
        Ok(model)
    }

    /// Lists live categories ordered by kind, parent and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        ledger_id: i64,
        kind: Option<CategoryKind>,
    ) -> RepoResult<Vec<categories::Model>> {
        let mut query = categories::Entity::find_live()
            .filter(categories::Column::LedgerId.eq(ledger_id))
            .order_by_asc(categories::Column::Kind)
            .order_by_asc(categories::Column::ParentId)
            .order_by_asc(categories::Column::Id);

        if let Some(kind) = kind {
            query = query
                .filter(categories::Column::Kind.eq(sea_orm_active_enums::CategoryKind::from(kind)));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a live category by ID.
    ///
    /// # Errors
    ///
    /// Returns `category not found` if the category is missing or deleted.
    pub async fn find_category(&self, id: i64) -> RepoResult<categories::Model> {
        categories::Entity::find_live_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::CategoryNotFound.into())
    }

    /// Applies a partial update.
    ///
    /// The merged kind and parent are checked together, so changing only the
    /// kind still re-checks the existing parent. Live children must keep
    /// matching the category's kind.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a tree rule is broken.
    pub async fn update_category(
        &self,
        id: i64,
        input: UpdateCategoryInput,
    ) -> RepoResult<categories::Model> {
        if input.is_empty() {
            return Err(LedgerError::NoFieldsToUpdate.into());
        }

        let current = self.find_category(id).await?;
        let kind = input.kind.unwrap_or(CategoryKind::from(current.kind));
        let parent_id = match input.parent_id {
            Some(requested) => category::normalize_parent_id(requested),
            None => current.parent_id,
        };

        if parent_id == Some(id) {
            return Err(LedgerError::CategorySelfParent.into());
        }
        if let Some(parent_id) = parent_id {
            let parent = find_parent(&self.db, parent_id).await?;
            category::check_parent(Some(id), current.ledger_id, kind, &parent)?;
        }
        if input.kind.is_some() {
            let mismatched = categories::Entity::find_live()
                .filter(categories::Column::ParentId.eq(id))
                .filter(
                    categories::Column::Kind.ne(sea_orm_active_enums::CategoryKind::from(kind)),
                )
                .count(&self.db)
                .await?;
            if mismatched > 0 {
                return Err(LedgerError::ParentKindMismatch.into());
            }
        }

        let mut active: categories::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(validation::normalize_name(&name)?);
        }
        active.kind = Set(kind.into());
        active.parent_id = Set(parent_id);

        let model = active.update(&self.db).await?;
        debug!(category_id = id, "category updated");
        Ok(model)
    }

    /// Soft-deletes a category without live children.
    ///
    /// # Errors
    ///
    /// Returns `category has child categories` while children remain.
    pub async fn delete_category(&self, id: i64) -> RepoResult<()> {
        self.find_category(id).await?;

        let children = categories::Entity::find_live()
            .filter(categories::Column::ParentId.eq(id))
            .count(&self.db)
            .await?;
        category::check_deletable(children)?;

        categories::Entity::soft_delete_many()
            .filter(categories::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        debug!(category_id = id, "category deleted");
        Ok(())
    }
}

async fn find_parent<C: ConnectionTrait>(conn: &C, parent_id: i64) -> RepoResult<CategoryInfo> {
    categories::Entity::find_live_by_id(parent_id)
        .one(conn)
        .await?
        .map(|parent| CategoryInfo::from(&parent))
        .ok_or_else(|| LedgerError::ParentCategoryNotFound.into())
}
