#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use catalogflow::router::init_router;
use catalogflow::state::AppState;
use catalogflow_config::{JwtConfig, ServerConfig};
use catalogflow_core::hash_password;
use catalogflow_db::{MemoryStore, NewUser, UserRepository};
use catalogflow_models::{GlobalRole, User};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_PASSWORD: &str = "testpass123";

/// A random, lowercase email unlikely to collide within one store.
pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}-{}", uuid::Uuid::new_v4().simple(), email.to_lowercase())
}

pub struct TestApp {
    pub store: MemoryStore,
    pub state: AppState,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET, "HS256", 60, 7).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_server_config(ServerConfig::default())
    }

    pub fn with_server_config(server_config: ServerConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(
            Arc::new(store.users()),
            Arc::new(store.teams()),
            jwt_config(),
            server_config,
        );
        Self { store, state }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    /// Inserts an active, verified user whose password is [`TEST_PASSWORD`].
    pub async fn seed_user(&self, email: &str, role: GlobalRole) -> User {
        self.store
            .users()
            .create(NewUser {
                full_name: "Test User".into(),
                email: email.to_lowercase(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                global_role: role,
                is_verified: true,
                created_by: None,
            })
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str) -> Value {
        let (status, body) = self.send(login_request(email, TEST_PASSWORD)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }

    /// Seeds a user with `role` and returns it with a fresh access token.
    pub async fn user_with_token(&self, email: &str, role: GlobalRole) -> (User, String) {
        let user = self.seed_user(email, role).await;
        let body = self.login(email).await;
        let token = body["access_token"].as_str().unwrap().to_string();
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(self.router(), request).await
    }
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    let form = format!(
        "username={}&password={}",
        username.replace('@', "%40"),
        password
    );
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
