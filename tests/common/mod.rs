#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use cadastro::app::build_app;
use cadastro::state::AppState;

pub struct TestContext {
    pub state: AppState,
    pub app: Router,
}

pub fn build_test_context() -> TestContext {
    let state = AppState::fake();
    let app = build_app(state.clone());
    TestContext { state, app }
}

/// Fires one JSON request at the in-memory app and decodes the response.
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("request should build");

    send(app, request).await
}

/// Variant taking the Authorization header verbatim, for scheme tests.
pub async fn request_json_raw_auth(
    app: &Router,
    method: &str,
    uri: &str,
    auth_header: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", auth_header)
        .body(Body::from(body.to_string()))
        .expect("request should build");

    send(app, request).await
}

/// Same as `request_json` but with no body and no content type.
pub async fn request_no_body(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).expect("request should build");

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should be handled");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, body)
}

/// Registers a user and returns the created record as JSON.
pub async fn register_user(app: &Router, nome: &str, email: &str, senha: &str) -> Value {
    let (status, body) = request_json(
        app,
        "POST",
        "/usuarios",
        None,
        json!({ "nome": nome, "email": email, "senha": senha }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body
}

/// Logs a user in and returns the session token.
pub async fn login_user(app: &Router, email: &str, senha: &str) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/login",
        None,
        json!({ "email": email, "senha": senha }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}
