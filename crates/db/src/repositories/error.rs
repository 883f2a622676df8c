//! Error type shared by the ledger repositories.

use hearth_core::ledger::LedgerError;
use sea_orm::{DbErr, SqlErr};
use tracing::debug;

/// Errors returned by repository operations.
///
/// Domain failures keep their [`LedgerError`]; everything raised by the
/// store is kept apart so callers can tell client errors from server errors.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Validation or lookup failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Unique constraint hit by a concurrent writer.
    ///
    /// Carries a fixed message; the driver detail is only logged.
    #[error("Conflict: {0}")]
    Conflict(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                debug!(%detail, "unique constraint violated");
                Self::Conflict(conflict_message(&detail))
            }
            _ => Self::Database(err),
        }
    }
}

/// User-facing message for a unique violation.
fn conflict_message(detail: &str) -> &'static str {
    if detail.contains("idx_securities_ticker") {
        "security ticker already exists"
    } else {
        "record already exists"
    }
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepositoryError>;
