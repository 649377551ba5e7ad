use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use vocab_backend::config::Config;
use vocab_backend::db::Database;
use vocab_backend::state::AppState;

/// Builds an app backed by a fresh in-memory database. The dictionary API is
/// pointed at a closed local port so no test ever talks to the network.
pub async fn create_test_app() -> (Router, Arc<Database>) {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
    std::env::set_var("DICTIONARY_API_URL", "http://127.0.0.1:9");
    std::env::set_var("DICTIONARY_TIMEOUT_SECS", "1");

    let db = Arc::new(
        Database::connect("sqlite::memory:")
            .await
            .expect("in-memory database"),
    );
    let state = AppState::new(Config::from_env(), Some(Arc::clone(&db)));
    (vocab_backend::create_app(state), db)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("request")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .expect("request")
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    with_auth(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn with_auth(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Registers a user and returns their auth token.
pub async fn register_user(app: &Router, username: &str) -> String {
    let response = send(
        app,
        post_json(
            "/api/auth/register",
            None,
            serde_json::json!({ "username": username, "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["token"]
        .as_str()
        .expect("token in register response")
        .to_string()
}
