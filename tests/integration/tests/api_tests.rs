//! API Integration Tests
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory repositories. No database or environment variables are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{Duration, Utc};
use cloudgaming_core::AccountStatus;
use integration_tests::{
    assert_json, assert_status, fixtures::*, test_config_with, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let ready: ReadinessResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(ready.status, "ready");
    assert_eq!(ready.checks.database, "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Register / Authenticate
// ============================================================================

#[tokio::test]
async fn test_register_then_me_returns_same_account() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::new("alice@example.com", "Passw0rd!");

    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.email, "alice@example.com");
    assert_eq!(auth.status, "active");
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 15 * 60);
    assert!(!auth.token.is_empty());

    let response = server.get_auth("/auth/me", &auth.token).await.unwrap();
    let me: MeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.id);
    assert_eq!(me.email, "alice@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // Same address in a different case is still the same account
    let again = RegisterRequest::new(&request.email.to_uppercase(), "Another1pass");
    let response = server.post("/auth/register", &again).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.error.code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::new("weak@example.com", "short");

    let response = server.post("/auth/register", &request).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.error.code, "VALIDATION_ERROR");
    let details = error.error.details.expect("validation details");
    assert!(details.get("password").is_some());
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::new("not-an-email", "Passw0rd!");

    let response = server.post("/auth/register", &request).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.post_raw("/auth/register", "{\"email\":").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_BODY");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await.expect("Failed to start server");

    let register_req = RegisterRequest::unique();
    let response = server.post("/auth/register", &register_req).await.unwrap();
    let registered: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let login_req = LoginRequest::from_register(&register_req);
    let response = server.post("/auth/login", &login_req).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.id, registered.id);
    assert!(!auth.token.is_empty());

    let response = server.get_auth("/games", &auth.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::new("bob@example.com", "Passw0rd!");
    server.post("/auth/register", &register_req).await.unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::new("bob@example.com", "Wr0ngpass"))
        .await
        .unwrap();
    let wrong_password: ErrorResponse =
        assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::new("nobody@example.com", "Passw0rd!"))
        .await
        .unwrap();
    let unknown_email: ErrorResponse =
        assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(wrong_password.error, unknown_email.error);
    assert_eq!(wrong_password.error.code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_suspended_account() {
    let server = TestServer::start().await.expect("Failed to start server");
    let register_req = RegisterRequest::unique();
    let response = server.post("/auth/register", &register_req).await.unwrap();
    let registered: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    server
        .set_account_status(&registered.id, AccountStatus::Suspended)
        .unwrap();

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&register_req))
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.error.code, "ACCOUNT_INACTIVE");

    // Tokens issued before the suspension stay valid until they expire
    let response = server.get_auth("/games", &registered.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Token Gating
// ============================================================================

#[tokio::test]
async fn test_games_require_token() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/games").await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rejected_tokens_share_one_response() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/auth/register", &RegisterRequest::unique())
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Flip one character of the signature
    let mut tampered = auth.token.clone().into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let authorizations = [
        format!("Bearer {tampered}"),
        "Bearer not-a-token".to_string(),
        format!("Basic {}", auth.token),
    ];

    let mut bodies = Vec::new();
    for value in &authorizations {
        let response = server.get_with_authorization("/auth/me", value).await.unwrap();
        let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
        bodies.push(error.error);
    }

    let response = server.get("/auth/me").await.unwrap();
    let missing: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    for body in &bodies {
        assert_eq!(body, &missing.error);
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/auth/register", &RegisterRequest::unique())
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Same account, issued 16 minutes ago with the server's 15 minute lifetime
    let stale = server
        .token_service()
        .unwrap()
        .issue_at(&auth.id, &auth.email, Utc::now() - Duration::minutes(16))
        .unwrap();

    let response = server.get_auth("/games", &stale.token).await.unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.error.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let other = TestServer::start_with_config(
        test_config_with(&[("JWT_SECRET", "a-completely-different-secret-0123456789")]).unwrap(),
    )
    .await
    .expect("Failed to start server");

    let response = other
        .post("/auth/register", &RegisterRequest::unique())
        .await
        .unwrap();
    let foreign: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server.get_auth("/games", &foreign.token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_list_games() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/auth/register", &RegisterRequest::unique())
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server.get_auth("/games", &auth.token).await.unwrap();
    let games: Vec<GameResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(games.len(), 3);
    let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
    let mut sorted = titles.clone();
    sorted.sort_unstable();
    assert_eq!(titles, sorted);
    assert!(games.iter().all(|g| g.status == "READY" || g.status == "PREPARE"));
}
