mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{TestApp, PASSWORD};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn login_sets_an_http_only_session_cookie() {
    let app = TestApp::new();
    app.signup("ana", "a@x.com").await;

    let response = app.login("a@x.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["msg"], "Logged in");
    assert_eq!(response.body["user"]["username"], "ana");
    assert!(response.session_cookie.is_some());
    assert_eq!(app.sessions.len().await, 1);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_rejected_alike() {
    let app = TestApp::new();
    app.signup("ana", "a@x.com").await;

    let wrong = app.login("a@x.com", "not-the-password").await;
    let unknown = app.login("b@x.com", PASSWORD).await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["msg"], unknown.body["msg"]);
    assert!(app.sessions.is_empty().await);
}

#[tokio::test]
async fn email_lookup_is_exact() {
    let app = TestApp::new();
    app.signup("ana", "a@x.com").await;
    assert_eq!(
        app.login("A@X.COM", PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn status_reflects_the_session() {
    let app = TestApp::new();
    let anonymous = app
        .request(Method::GET, "/api/v1/auth/status", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body, json!({"authenticated": false}));

    let (user_id, sid) = app.manager("ana", "a@x.com").await;
    let status = app
        .request(Method::GET, "/api/v1/auth/status", None, Some(&sid))
        .await;
    assert_eq!(status.body["authenticated"], true);
    assert_eq!(status.body["user"]["id"], user_id.to_string());
    assert!(status.body["expiresAt"].is_string());
}

#[tokio::test]
async fn logout_twice_fails_the_second_time() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;

    let first = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&sid))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["msg"], "Logged Out");

    let second = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&sid))
        .await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);

    let after = app
        .request(Method::GET, "/api/v1/properties", None, Some(&sid))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_is_unauthenticated() {
    let app = TestApp::new();
    let response = app
        .request(Method::POST, "/api/v1/auth/logout", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn relogin_replaces_the_previous_session() {
    let app = TestApp::new();
    let (_, first) = app.manager("ana", "a@x.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth",
            Some(json!({"email": "a@x.com", "password": PASSWORD})),
            Some(&first),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_ne!(response.session_cookie.as_deref(), Some(first.as_str()));
    assert_eq!(app.sessions.len().await, 1);
}

#[tokio::test]
async fn bearer_session_handle_is_accepted() {
    let app = TestApp::new();
    let (_, sid) = app.manager("ana", "a@x.com").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/properties")
        .header(header::AUTHORIZATION, format!("Bearer {sid}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_session_handle_is_unauthenticated() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::GET,
            "/api/v1/properties",
            None,
            Some("6f1c0c4e-1a8e-4a57-9d5e-2b8f1f4c9a11"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_and_welcome_are_public() {
    let app = TestApp::new();
    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.body, json!({"status": "ok"}));
    let root = app.request(Method::GET, "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
}
