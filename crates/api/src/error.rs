//! Error responses.
//!
//! Handlers return [`ApiError`], which renders as
//! `{"error": "<CODE>", "message": "<text>"}` with the status of the wrapped
//! [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hearth_core::ledger::{ErrorKind, LedgerError};
use hearth_db::RepositoryError;
use hearth_shared::AppError;
use serde_json::json;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Wraps a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Wraps an authentication failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self(AppError::Validation(message)),
            ErrorKind::NotFound => Self(AppError::NotFound(message)),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(e) => e.into(),
            RepositoryError::Conflict(message) => Self(AppError::Conflict(message.to_string())),
            RepositoryError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, "request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::ledger::AccountRole;
    use sea_orm::DbErr;

    #[test]
    fn test_ledger_errors_map_by_kind() {
        let ApiError(err) = LedgerError::ZeroAmount.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "amount cannot be 0");

        let ApiError(err) = LedgerError::AccountNotFound(AccountRole::Cash).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "cash account not found");
    }

    #[test]
    fn test_database_errors_are_hidden() {
        let ApiError(err) =
            RepositoryError::Database(DbErr::Custom("password=hunter2".to_string())).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_conflicts_carry_fixed_message() {
        let ApiError(err) = RepositoryError::Conflict("security ticker already exists").into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.public_message(), "security ticker already exists");
    }
}
