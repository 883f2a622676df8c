//! Category tree rules.
//!
//! The tree is stored as a parent id per row and resolved by lookup, so the
//! checks here only ever see one parent at a time.

use super::error::LedgerError;
use super::types::{CategoryInfo, CategoryKind};

/// Checks that `parent` may become the parent of a category.
///
/// `category_id` is `None` while the category is being created.
pub fn check_parent(
    category_id: Option<i64>,
    ledger_id: i64,
    kind: CategoryKind,
    parent: &CategoryInfo,
) -> Result<(), LedgerError> {
    if category_id == Some(parent.id) {
        return Err(LedgerError::CategorySelfParent);
    }
    if parent.ledger_id != ledger_id {
        return Err(LedgerError::ParentCategoryNotFound);
    }
    if parent.kind != kind {
        return Err(LedgerError::ParentKindMismatch);
    }
    Ok(())
}

/// Interprets a requested parent id, where 0 clears the parent.
#[must_use]
pub fn normalize_parent_id(parent_id: Option<i64>) -> Option<i64> {
    parent_id.filter(|id| *id != 0)
}

/// Checks a category may be deleted.
pub fn check_deletable(live_children: u64) -> Result<(), LedgerError> {
    if live_children > 0 {
        return Err(LedgerError::CategoryHasChildren);
    }
    Ok(())
}
