//! Router-level tests.
//!
//! Most tests run against a disconnected database, so every request is
//! answered by the middleware or by validation that runs before the store.
//! Store failures are simulated with a mock connection.

use std::sync::{Arc, LazyLock};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use hearth_core::auth::hash_password;
use hearth_shared::config::{AuthConfig, JwtConfig, LedgerConfig};
use hearth_shared::jwt::JwtService;
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

static PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("s3cret").expect("hash test password"));

fn jwt_config(token_ttl_hours: i64) -> JwtConfig {
    JwtConfig {
        secret: "router-test-secret".to_string(),
        issuer: "hearth".to_string(),
        token_ttl_hours,
        remember_ttl_days: 30,
    }
}

fn test_state() -> AppState {
    state_with_db(DatabaseConnection::Disconnected)
}

fn state_with_db(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(&jwt_config(24))),
        auth: Arc::new(AuthConfig {
            username: "owner".to_string(),
            password_hash: PASSWORD_HASH.clone(),
        }),
        ledger: Arc::new(LedgerConfig::default()),
    }
}

fn app() -> Router {
    create_router(test_state())
}

fn token() -> String {
    JwtService::new(&jwt_config(24))
        .issue("owner", false)
        .expect("issue token")
        .token
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    send_to(app(), request).await
}

async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token()));
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_health_needs_no_auth() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[case(None, "missing authorization header")]
#[case(Some("Basic b3duZXI6czNjcmV0"), "invalid authorization format")]
#[case(Some("Bearer not.a.token"), "invalid token")]
#[tokio::test]
async fn test_protected_routes_reject_bad_auth(
    #[case] header: Option<&str>,
    #[case] message: &str,
) {
    let mut builder = Request::builder().uri("/api/accounts");
    if let Some(header) = header {
        builder = builder.header(AUTHORIZATION, header);
    }

    let (status, body) = send(builder.body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let expired = JwtService::new(&jwt_config(-2))
        .issue("owner", false)
        .unwrap()
        .token;

    let (status, body) = send(
        Request::builder()
            .uri("/api/auth/me")
            .header(AUTHORIZATION, format!("Bearer {expired}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token expired");
}

#[tokio::test]
async fn test_login_issues_usable_token() {
    let (status, body) = send(
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(
                json!({"username": "owner", "password": "s3cret"}).to_string(),
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["username"], "owner");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = send(
        Request::builder()
            .uri("/api/auth/me")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "owner");
}

#[rstest]
#[case("owner", "wrong")]
#[case("intruder", "s3cret")]
#[tokio::test]
async fn test_login_rejects_bad_credentials(#[case] username: &str, #[case] password: &str) {
    let (status, body) = send(
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(
                json!({"username": username, "password": password}).to_string(),
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[case::bad_ledger("GET", "/api/accounts?ledger_id=0", None, "ledger_id must be positive")]
#[case::bad_account_type(
    "POST",
    "/api/accounts",
    Some(json!({"name": "Wallet", "type": "savings"})),
    "type must be one of: cash, liability, debt, investment, other_asset"
)]
#[case::empty_account_patch("PATCH", "/api/accounts/1", Some(json!({})), "no fields to update")]
#[case::bad_category_kind(
    "POST",
    "/api/categories",
    Some(json!({"name": "Gifts", "kind": "gift"})),
    "kind must be one of: income, expense, transfer, investment"
)]
#[case::empty_category_patch("PATCH", "/api/categories/1", Some(json!({})), "no fields to update")]
#[case::null_snapshot_amount(
    "PATCH",
    "/api/account-snapshots/1",
    Some(json!({"amount": null})),
    "amount cannot be null"
)]
#[case::transfer_kind_filter("GET", "/api/transactions?kind=transfer", None, "kind must be income or expense")]
#[case::zero_entry(
    "POST",
    "/api/transactions",
    Some(json!({"occurred_on": "2024-01-15", "account_id": 1, "category_id": 2, "amount": "0"})),
    "amount cannot be 0"
)]
#[case::same_account_transfer(
    "POST",
    "/api/transfers",
    Some(json!({"occurred_on": "2024-01-15", "from_account_id": 1, "to_account_id": 1, "amount": 10})),
    "from_account_id and to_account_id must be different"
)]
#[case::zero_quantity_buy(
    "POST",
    "/api/investments/buys",
    Some(json!({
        "occurred_on": "2024-01-15",
        "security_ticker": "ACME",
        "security_name": "Acme Corp",
        "cash_account_id": 1,
        "investment_account_id": 2,
        "quantity": 0,
        "price": "100"
    })),
    "quantity and price must be greater than 0"
)]
#[case::huge_buy(
    "POST",
    "/api/investments/buys",
    Some(json!({
        "occurred_on": "2024-01-15",
        "security_ticker": "ACME",
        "security_name": "Acme Corp",
        "cash_account_id": 1,
        "investment_account_id": 2,
        "quantity": "100000000000000000000",
        "price": "100000000000000000000"
    })),
    "amount out of range"
)]
#[case::sub_scale_buy(
    "POST",
    "/api/investments/buys",
    Some(json!({
        "occurred_on": "2024-01-15",
        "security_ticker": "ACME",
        "security_name": "Acme Corp",
        "cash_account_id": 1,
        "investment_account_id": 2,
        "quantity": "0.000000001",
        "price": "1"
    })),
    "values allow at most 8 decimal places"
)]
#[case::sub_scale_snapshot(
    "POST",
    "/api/account-snapshots",
    Some(json!({"account_id": 1, "as_of": "2024-01-31", "amount": "10.000000004"})),
    "values allow at most 8 decimal places"
)]
#[case::empty_allocations(
    "POST",
    "/api/investments/sales",
    Some(json!({
        "occurred_on": "2024-02-01",
        "security_id": 1,
        "cash_account_id": 1,
        "investment_account_id": 2,
        "price": "120",
        "allocations": []
    })),
    "allocations cannot be empty"
)]
#[case::bad_lot_status("GET", "/api/investments/lots?status=pending", None, "status must be open or closed")]
#[tokio::test]
async fn test_validation_fails_before_store(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] body: Option<Value>,
    #[case] message: &str,
) {
    let (status, response) = send(authed(method, uri, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "VALIDATION_ERROR");
    assert_eq!(response["message"], message);
}

#[tokio::test]
async fn test_store_failure_is_opaque() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset; password=hunter2".to_string())])
        .into_connection();
    let app = create_router(state_with_db(db));

    let (status, body) = send_to(app, authed("GET", "/api/accounts", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert_eq!(body["message"], "internal server error");
    assert!(!body.to_string().contains("hunter2"));
}
