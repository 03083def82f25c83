//! Shared helpers for HTTP-level integration tests.
//!
//! The app under test is built over a lazy pool that never connects. Every
//! request exercised here resolves before its first query: routing, body and
//! path extraction, query-grammar validation, auth short-circuits, rate
//! limiting, and error mapping. Flows that must reach the database live in
//! the repository-level tests instead.

#![allow(dead_code)] // not every test file uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use trailhead_api::auth::jwt::JwtConfig;
use trailhead_api::config::{RateLimitConfig, RuntimeEnv, ServerConfig};
use trailhead_api::middleware::rate_limit::RateLimiter;
use trailhead_api::router::build_app_router;
use trailhead_api::state::AppState;

/// Secret used to sign tokens in tests. Anything signed with a different
/// secret must be rejected by the app.
pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        env: RuntimeEnv::Development,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_days: 90,
        },
        rate_limit: RateLimitConfig {
            max_requests: 100,
            window_secs: 3600,
        },
        email: None,
    }
}

/// Build the full application router over a pool that never connects.
///
/// Mirrors `main.rs` through [`build_app_router`], so tests run the same
/// middleware stack as production.
pub fn build_test_app(config: ServerConfig) -> Router {
    let pool = trailhead_db::lazy_pool("postgres://localhost:5432/trailhead_test")
        .expect("lazy pool options are valid");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
        rate_limiter: Arc::new(RateLimiter::new(config.rate_limit)),
    };

    build_app_router(state, &config)
}

/// App with the default test configuration.
pub fn test_app() -> Router {
    build_test_app(test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Drive one request through the router without binding a socket.
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request)
        .await
        .expect("router should always produce a response")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PATCH, uri, body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Collect the response body as a UTF-8 string.
pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
