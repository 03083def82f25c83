//! HTTP-level tests for the authentication surface: credential checking,
//! logout, and the token-resolution chain on protected routes.
//!
//! Everything here resolves before the first database query, so the suite
//! runs without a live server or database.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, get, get_auth, get_with_cookie, patch_json, post_json};
use trailhead_api::auth::jwt::{generate_session_token, JwtConfig};
use trailhead_api::middleware::auth::NOT_LOGGED_IN;

// ---------------------------------------------------------------------------
// Login credential checks
// ---------------------------------------------------------------------------

/// An empty login body gets the canonical message, not a serde rejection.
#[tokio::test]
async fn login_with_empty_body_returns_400() {
    let response = post_json(
        common::test_app(),
        "/api/v1/users/login",
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "fail");
    assert_eq!(json["message"], "Please provide both email and password");
}

/// A missing password gets the same message as a fully empty body.
#[tokio::test]
async fn login_without_password_returns_400() {
    let body = serde_json::json!({ "email": "laura@example.com" });
    let response = post_json(common::test_app(), "/api/v1/users/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please provide both email and password");
}

/// Empty strings count as missing credentials.
#[tokio::test]
async fn login_with_empty_strings_returns_400() {
    let body = serde_json::json!({ "email": "", "password": "" });
    let response = post_json(common::test_app(), "/api/v1/users/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Please provide both email and password");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout succeeds for anyone and overwrites the session cookie with the
/// short-lived sentinel.
#[tokio::test]
async fn logout_sets_sentinel_cookie() {
    let response = get(common::test_app(), "/api/v1/users/logout").await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout must set a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        set_cookie,
        "session=loggedout; Max-Age=5; Path=/; HttpOnly; SameSite=Lax"
    );

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "status": "success" }));
}

// ---------------------------------------------------------------------------
// Token resolution on protected routes
// ---------------------------------------------------------------------------

/// No token anywhere: 401 with the not-logged-in message.
#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let response = get(common::test_app(), "/api/v1/users/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "fail");
    assert_eq!(json["message"], NOT_LOGGED_IN);
}

/// A bearer token that is not a JWT at all: 401 invalid-token.
#[tokio::test]
async fn garbage_bearer_token_returns_401() {
    let response = get_auth(common::test_app(), "/api/v1/users/me", "garbage").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Invalid or expired token. Please log in again."
    );
}

/// A structurally valid token signed with the wrong secret: 401.
#[tokio::test]
async fn wrong_secret_token_returns_401() {
    let foreign = JwtConfig {
        secret: "a-different-secret-entirely".to_string(),
        expiry_days: 90,
    };
    let token = generate_session_token(1, &foreign).unwrap();

    let response = get_auth(common::test_app(), "/api/v1/users/me", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Invalid or expired token. Please log in again."
    );
}

/// The session cookie is a fallback token source; garbage there is also 401.
#[tokio::test]
async fn garbage_session_cookie_returns_401() {
    let response =
        get_with_cookie(common::test_app(), "/api/v1/users/me", "session=nonsense").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Invalid or expired token. Please log in again."
    );
}

/// The logout sentinel is not a valid token; carrying it is the same as
/// carrying garbage.
#[tokio::test]
async fn logout_sentinel_cookie_returns_401() {
    let response =
        get_with_cookie(common::test_app(), "/api/v1/users/me", "session=loggedout").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A bearer header takes precedence over the cookie: a garbage bearer fails
/// even if a cookie is also present.
#[tokio::test]
async fn bearer_takes_precedence_over_cookie() {
    let app = common::test_app();
    let request = axum::http::Request::builder()
        .uri("/api/v1/users/me")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .header(header::COOKIE, "session=also-not-a-token")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Invalid or expired token. Please log in again."
    );
}

// ---------------------------------------------------------------------------
// Guarded write routes authenticate before anything else
// ---------------------------------------------------------------------------

/// Role-guarded tour management rejects anonymous calls with 401 (not 403):
/// authentication is checked before authorization.
#[tokio::test]
async fn tour_write_without_token_returns_401() {
    let response = common::delete(common::test_app(), "/api/v1/tours/1").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], NOT_LOGGED_IN);
}

/// Admin user management rejects anonymous calls the same way.
#[tokio::test]
async fn admin_list_without_token_returns_401() {
    let response = get(common::test_app(), "/api/v1/users").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Password change requires a session.
#[tokio::test]
async fn update_password_without_token_returns_401() {
    let body = serde_json::json!({
        "password_current": "old-password",
        "password": "new-password-1",
        "password_confirm": "new-password-1"
    });
    let response = patch_json(common::test_app(), "/api/v1/users/update-password", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], NOT_LOGGED_IN);
}

/// Review creation requires a session before any body handling.
#[tokio::test]
async fn create_review_without_token_returns_401() {
    let body = serde_json::json!({ "review": "Nice", "rating": 5, "tour_id": 1 });
    let response = post_json(common::test_app(), "/api/v1/reviews", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
