//! Integration tests for registration, login and the access gate.

use axum::http::StatusCode;

use docvault_database::UserStore;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new().await;

    let response = app.register("Alice", "alice@example.com", "pw-alice").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Registration successful");
    assert_eq!(response.body["data"]["email"], "alice@example.com");
    assert_eq!(response.body["data"]["name"], "Alice");
    assert!(response.body["data"].get("passwordHash").is_none());
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_accepts_nama_alias() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "nama": "Budi",
                "email": "budi@example.com",
                "password": "pw-budi",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["name"], "Budi");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "pw-alice").await;

    let response = app.register("Other", "alice@example.com", "pw-other").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let app = TestApp::new().await;

    let response = app.register("Alice", "not-an-email", "pw").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "pw-alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@example.com",
                "password": "pw-alice",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert!(!response.body["token"].as_str().unwrap().is_empty());
    assert_eq!(response.body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.register("Alice", "alice@example.com", "pw-alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@example.com",
                "password": "wrong",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": "pw",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/files", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_removed_user_is_rejected() {
    let app = TestApp::new().await;
    let token = app.signed_in("gone@example.com").await;

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(listed.status, StatusCode::OK);

    let user = app
        .users
        .find_by_email("gone@example.com")
        .await
        .unwrap()
        .expect("user should exist");
    app.users.remove(user.id);

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
