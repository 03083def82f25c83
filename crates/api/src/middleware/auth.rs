//! Session-based authentication extractors for Axum handlers.
//!
//! [`CurrentUser`] is the required-authentication stage: the token comes from
//! the `Authorization: Bearer` header or, failing that, the session cookie;
//! it is then verified, the account is resolved fresh from the database, and
//! tokens minted before the account's last password change are rejected.
//!
//! [`MaybeUser`] runs the same resolution but never fails the request; any
//! verification problem degrades to an anonymous request. View routes use it
//! to personalize otherwise-public pages.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use trailhead_core::error::CoreError;
use trailhead_db::models::user::User;
use trailhead_db::repositories::UserRepo;

use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::jwt::validate_session_token;
use crate::error::AppError;
use crate::state::AppState;

pub const NOT_LOGGED_IN: &str = "You are not logged in. Please log in to get access.";
const INVALID_TOKEN: &str = "Invalid or expired token. Please log in again.";
const USER_GONE: &str = "The user belonging to this token no longer exists.";
const PASSWORD_CHANGED: &str = "Password was changed recently. Please log in again.";

/// Authenticated account attached to the request.
///
/// Use this as an extractor parameter in any handler that requires a logged-in
/// caller:
///
/// ```ignore
/// async fn my_handler(CurrentUser(user): CurrentUser) -> AppResult<Json<Value>> {
///     tracing::info!(user_id = user.id, "handling request");
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| unauthorized(NOT_LOGGED_IN))?;
        let user = resolve_principal(&token, state).await?;
        Ok(CurrentUser(user))
    }
}

/// Optionally authenticated account: `None` when the request carries no
/// usable session. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(parts) else {
            return Ok(MaybeUser(None));
        };
        Ok(MaybeUser(resolve_principal(&token, state).await.ok()))
    }
}

/// Verify a token and load the account it belongs to.
///
/// The account is re-read on every request: deactivated or deleted accounts
/// stop resolving immediately, and a password change invalidates every token
/// issued before it.
async fn resolve_principal(token: &str, state: &AppState) -> Result<User, AppError> {
    let claims = validate_session_token(token, &state.config.jwt)
        .map_err(|_| unauthorized(INVALID_TOKEN))?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| unauthorized(USER_GONE))?;

    if user.changed_password_after(claims.iat) {
        return Err(unauthorized(PASSWORD_CHANGED));
    }

    Ok(user)
}

/// Pull the session token out of the request, bearer header first.
///
/// An `Authorization` header that is not `Bearer <token>` is ignored and the
/// cookie is consulted instead.
fn extract_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
