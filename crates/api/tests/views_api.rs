//! HTTP-level tests for the server-rendered pages mounted at the site root.

mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_text, get, get_with_cookie};

// ---------------------------------------------------------------------------
// Login page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_page_renders_html() {
    let response = get(common::test_app(), "/login").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(
        content_type.starts_with("text/html"),
        "expected an HTML response, got {content_type}"
    );

    let html = body_text(response).await;
    assert!(html.contains("Log into your account"));
}

/// Page authentication is optional: an unusable session cookie renders the
/// page anonymously instead of failing the request.
#[tokio::test]
async fn login_page_tolerates_garbage_session_cookie() {
    let response =
        get_with_cookie(common::test_app(), "/login", "session=definitely-not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Log into your account"));
}

// ---------------------------------------------------------------------------
// Account page
// ---------------------------------------------------------------------------

/// The account page is for logged-in visitors only; anonymous requests get
/// the standard JSON error envelope.
#[tokio::test]
async fn account_page_requires_session() {
    let response = get(common::test_app(), "/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "fail");
}

/// The profile form post is likewise guarded, and the session is checked
/// before the form body is read at all.
#[tokio::test]
async fn submit_user_data_requires_session() {
    let app = common::test_app();
    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/submit-user-data")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from("name=New+Name&email=new%40example.com"))
        .unwrap();

    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
