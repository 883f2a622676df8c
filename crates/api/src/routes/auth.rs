//! Authentication routes for the single ledger owner.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use hearth_core::auth::check_credentials;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use hearth_shared::AppError;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that sit behind the bearer middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Issue a long-lived token.
    #[serde(default)]
    pub remember: bool,
}

/// Public view of the logged-in owner.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// Login name.
    pub username: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Encoded JWT.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Expiration as RFC3339.
    pub expires_at: String,
    /// The authenticated owner.
    pub user: UserInfo,
}

/// POST `/auth/login` - Exchange credentials for a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let valid = check_credentials(
        &payload.username,
        &payload.password,
        &state.auth.username,
        &state.auth.password_hash,
    )
    .map_err(|e| {
        error!(error = %e, "Stored password hash is unusable");
        ApiError(AppError::Internal(e.to_string()))
    })?;

    if !valid {
        info!(username = %payload.username, "Failed login attempt");
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let issued = state
        .jwt_service
        .issue(&payload.username, payload.remember)
        .map_err(|e| {
            error!(error = %e, "Failed to issue token");
            ApiError(AppError::Internal(e.to_string()))
        })?;

    info!(username = %payload.username, remember = payload.remember, "Login succeeded");
    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at.to_rfc3339(),
        user: UserInfo {
            username: payload.username,
        },
    }))
}

/// GET `/auth/me` - Identity behind the bearer token.
async fn me(user: AuthUser) -> Json<UserInfo> {
    Json(UserInfo {
        username: user.username().to_string(),
    })
}
