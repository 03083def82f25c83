//! Handlers for signup, login/logout, and the password flows.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;
use trailhead_core::error::CoreError;
use trailhead_core::reset::{expiry_from, generate_reset_token, hash_reset_token};
use trailhead_core::roles::Role;
use trailhead_core::validate;
use trailhead_db::models::user::{CreateUser, User, UserResponse};
use trailhead_db::repositories::UserRepo;

use crate::auth::cookie;
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response;
use crate::state::AppState;

const PROVIDE_CREDENTIALS: &str = "Please provide both email and password";
const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
const WRONG_CURRENT_PASSWORD: &str = "Your current password is wrong";
const NO_USER_WITH_EMAIL: &str = "There is no user with that email address";
const TOKEN_SENT: &str = "Token sent to email";
const EMAIL_FAILED: &str = "There was an error sending the email. Try again later";
const TOKEN_INVALID: &str = "Token is invalid or has expired";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/signup`.
///
/// The role is deliberately absent: every signup starts as a regular user,
/// and promotions go through the admin surface.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Request body for `POST /users/login`. Both fields are optional so a
/// partial body reaches the handler and gets the canonical message instead
/// of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /users/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `PATCH /users/reset-password/{token}`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

/// Request body for `PATCH /users/update-password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/signup
///
/// Create an account and log it in immediately.
pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<SignupRequest>, AppError>,
) -> AppResult<Response> {
    validate::validate_name(&input.name)?;
    validate::validate_email(&input.email)?;
    validate::validate_password(&input.password)?;
    validate::validate_password_pair(&input.password, &input.password_confirm)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::default(),
        },
    )
    .await?;

    send_session(&state, &user, StatusCode::CREATED)
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Response> {
    // 1. Both credentials must be present.
    let (Some(email), Some(password)) = (input.email, input.password) else {
        return Err(AppError::BadRequest(PROVIDE_CREDENTIALS.to_string()));
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(PROVIDE_CREDENTIALS.to_string()));
    }

    // 2. Look up the account, including the stored hash. The failure message
    //    is identical for an unknown email and a wrong password, so the
    //    response never confirms whether an account exists.
    let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? else {
        return Err(incorrect_credentials());
    };

    // 3. Verify the password.
    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(incorrect_credentials());
    }

    // 4. Issue a fresh session.
    send_session(&state, &user, StatusCode::OK)
}

/// GET /api/v1/users/logout
///
/// Overwrites the session cookie with a sentinel that expires in seconds.
/// The old token itself stays valid until its expiry; logout only clears the
/// browser's copy.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = cookie::logout_cookie(state.config.env.is_production());
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        response::success(),
    )
        .into_response()
}

/// POST /api/v1/users/forgot-password
///
/// Issue a single-use reset token, store its hash with a 10-minute expiry,
/// and mail the plaintext token inside a reset link.
pub async fn forgot_password(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<ForgotPasswordRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_USER_WITH_EMAIL.to_string()))?;

    let token = generate_reset_token();
    let expires = expiry_from(chrono::Utc::now());
    UserRepo::set_reset_token(&state.pool, user.id, Some(&token.hash), Some(expires)).await?;

    let reset_url = format!(
        "{}/api/v1/users/reset-password/{}",
        state.config.public_base_url, token.plaintext
    );

    let send_result = match &state.mailer {
        Some(mailer) => mailer
            .send_password_reset(&user.email, &reset_url)
            .await
            .map_err(|e| e.to_string()),
        None => Err("mailer is not configured".to_string()),
    };

    if let Err(reason) = send_result {
        tracing::error!(user_id = user.id, error = %reason, "Reset email dispatch failed");
        // A stored reset token implies a delivered email; clear it on failure.
        UserRepo::set_reset_token(&state.pool, user.id, None, None).await?;
        return Err(AppError::Mail(EMAIL_FAILED.to_string()));
    }

    Ok(response::message(TOKEN_SENT))
}

/// PATCH /api/v1/users/reset-password/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    WithRejection(Path(token), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<ResetPasswordRequest>, AppError>,
) -> AppResult<Response> {
    // 1. Re-hash the presented token and find the account holding it,
    //    unexpired. A wrong and an expired token are indistinguishable.
    let hash = hash_reset_token(&token);
    let user = UserRepo::find_by_reset_hash(&state.pool, &hash, chrono::Utc::now())
        .await?
        .ok_or_else(|| AppError::BadRequest(TOKEN_INVALID.to_string()))?;

    // 2. Validate and store the new password; this also clears the token.
    validate::validate_password(&input.password)?;
    validate::validate_password_pair(&input.password, &input.password_confirm)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    // 3. Log the account straight in.
    send_session(&state, &user, StatusCode::OK)
}

/// PATCH /api/v1/users/update-password
///
/// Password change for a logged-in account. Re-issues the session because
/// the change timestamp invalidates every previously issued token.
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<UpdatePasswordRequest>, AppError>,
) -> AppResult<Response> {
    let current_valid = verify_password(&input.password_current, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            WRONG_CURRENT_PASSWORD.to_string(),
        )));
    }

    validate::validate_password(&input.password)?;
    validate::validate_password_pair(&input.password, &input.password_confirm)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    send_session(&state, &user, StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a session token for `user` and build the authenticated response:
/// the token in the body, the same token in an `HttpOnly` cookie, and the
/// public account fields under `data.user`.
fn send_session(state: &AppState, user: &User, status: StatusCode) -> AppResult<Response> {
    let token = generate_session_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token signing error: {e}")))?;

    let cookie = cookie::session_cookie(
        &token,
        state.config.jwt.expiry_days,
        state.config.env.is_production(),
    );

    Ok((
        status,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        response::authenticated(&token, UserResponse::from(user)),
    )
        .into_response())
}

fn incorrect_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INCORRECT_CREDENTIALS.to_string()))
}
