mod common;

use std::time::Duration;

use axum::http::{StatusCode, header};
use catalogflow_auth::{TokenKind, decode_token, issue_token_pair};
use catalogflow_core::PasswordHash;
use catalogflow_db::{NewUser, UserRepository};
use catalogflow_models::GlobalRole;
use common::{
    TEST_PASSWORD, TestApp, empty_request, json_request, jwt_config, login_request, unique_email,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let email = unique_email();
    let user = app.seed_user(&email, GlobalRole::TeamMember).await;

    let body = app.login(&email).await;

    assert_eq!(body["token_type"], "bearer");
    let access = decode_token(body["access_token"].as_str().unwrap(), &jwt_config()).unwrap();
    let renewal = decode_token(body["refresh_token"].as_str().unwrap(), &jwt_config()).unwrap();
    assert_eq!(access.subject, user.id.into_inner());
    assert_eq!(access.kind, TokenKind::Access);
    assert_eq!(renewal.subject, user.id.into_inner());
    assert_eq!(renewal.kind, TokenKind::Renewal);
    assert!(renewal.expires_at > access.expires_at);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    let email = unique_email();
    app.seed_user(&email, GlobalRole::Viewer).await;

    let (status, _) = app
        .send(login_request(&format!("%20{}", email.to_uppercase()), TEST_PASSWORD))
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let email = unique_email();
    app.seed_user(&email, GlobalRole::TeamMember).await;

    let (wrong_status, wrong_body) = app.send(login_request(&email, "wrong-password")).await;
    let (unknown_status, unknown_body) = app
        .send(login_request(&unique_email(), TEST_PASSWORD))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_rejects_deactivated_user_like_unknown() {
    let app = TestApp::new();
    let email = unique_email();
    let user = app.seed_user(&email, GlobalRole::TeamMember).await;
    app.store.users().deactivate(user.id).await.unwrap();

    let (status, body) = app.send(login_request(&email, TEST_PASSWORD)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_with_unusable_stored_hash_is_invalid_credentials() {
    let app = TestApp::new();
    let email = unique_email();
    app.store
        .users()
        .create(NewUser {
            full_name: "Broken Hash".into(),
            email: email.clone(),
            password_hash: PasswordHash::from_stored("not-a-bcrypt-hash"),
            global_role: GlobalRole::TeamMember,
            is_verified: true,
            created_by: None,
        })
        .await
        .unwrap();

    let (status, body) = app.send(login_request(&email, TEST_PASSWORD)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_field_is_bad_request() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("username=a%40b.com"))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_issues_later_access_token() {
    let app = TestApp::new();
    let email = unique_email();
    app.seed_user(&email, GlobalRole::TeamMember).await;
    let tokens = app.login(&email).await;
    let first = decode_token(tokens["access_token"].as_str().unwrap(), &jwt_config()).unwrap();

    // exp has one-second resolution.
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": tokens["refresh_token"] }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let renewed = decode_token(body["access_token"].as_str().unwrap(), &jwt_config()).unwrap();
    assert_eq!(renewed.kind, TokenKind::Access);
    assert_eq!(renewed.subject, first.subject);
    assert!(renewed.expires_at > first.expires_at);
}

#[tokio::test]
async fn test_refresh_with_access_token_is_unauthorized() {
    let app = TestApp::new();
    let email = unique_email();
    app.seed_user(&email, GlobalRole::TeamMember).await;
    let tokens = app.login(&email).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": tokens["access_token"] }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Could not validate credentials");
}

#[tokio::test]
async fn test_refresh_with_garbage_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": "not.a.token" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_for_deactivated_user_is_not_found() {
    let app = TestApp::new();
    let email = unique_email();
    let user = app.seed_user(&email, GlobalRole::TeamMember).await;
    let tokens = app.login(&email).await;
    app.store.users().deactivate(user.id).await.unwrap();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": tokens["refresh_token"] }),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_refresh_for_unknown_subject_is_not_found() {
    let app = TestApp::new();
    let pair = issue_token_pair(uuid::Uuid::new_v4(), &jwt_config()).unwrap();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/auth/refresh",
            None,
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_me_returns_current_user_without_hash() {
    let app = TestApp::new();
    let email = unique_email();
    let (user, token) = app.user_with_token(&email, GlobalRole::Admin).await;

    let (status, body) = app.send(empty_request("GET", "/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["email"], email);
    assert_eq!(body["global_role"], "admin");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_me_rejects_renewal_token() {
    let app = TestApp::new();
    let email = unique_email();
    app.seed_user(&email, GlobalRole::TeamMember).await;
    let tokens = app.login(&email).await;

    let (status, _) = app
        .send(empty_request(
            "GET",
            "/auth/me",
            tokens["refresh_token"].as_str(),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthorized_carries_bearer_challenge() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(empty_request("GET", "/auth/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let email = unique_email();
    let user = app.seed_user(&email, GlobalRole::TeamMember).await;
    let other = catalogflow_config::JwtConfig::new(
        "a-completely-different-secret-of-32-chars",
        "HS256",
        60,
        7,
    )
    .unwrap();
    let forged = issue_token_pair(user.id.into_inner(), &other).unwrap();

    let (status, _) = app
        .send(empty_request("GET", "/auth/me", Some(&forged.access_token)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_welcome() {
    let app = TestApp::new();

    let (status, body) = app.send(empty_request("GET", "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to CatalogFlow");

    let (status, body) = app.send(empty_request("GET", "/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "CatalogFlow API is running");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let (status, body) = app
        .send(empty_request("GET", "/api-docs/openapi.json", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/auth/login"].is_object());
}

#[tokio::test]
async fn test_openapi_document_reports_configured_version() {
    let server_config = catalogflow_config::ServerConfig {
        version: "3.1.4".into(),
        ..Default::default()
    };
    let app = TestApp::with_server_config(server_config);

    let (status, body) = app
        .send(empty_request("GET", "/api-docs/openapi.json", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["version"], "3.1.4");
    assert_eq!(body["info"]["title"], "CatalogFlow API");
}
