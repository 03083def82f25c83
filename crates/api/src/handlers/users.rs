//! Handlers for the `/users` resource: self-service profile endpoints plus
//! the admin-only account CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;
use trailhead_core::types::DbId;
use trailhead_core::validate;
use trailhead_db::models::user::{UpdateUser, UserResponse};
use trailhead_db::repositories::UserRepo;

use crate::error::{AppError, AppResult, NO_DOCUMENT};
use crate::handlers::collection;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response;
use crate::state::AppState;

const NOT_FOR_PASSWORDS: &str =
    "This route is not for password updates. Please use /update-password";
const USE_SIGNUP: &str = "This route is not defined. Please use /signup instead";

/// Request body for `PATCH /users/update-me`.
///
/// The password fields exist only to reject password changes on this route;
/// their values are never read.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub password: Option<Value>,
    pub password_confirm: Option<Value>,
}

// ---------------------------------------------------------------------------
// Self-service
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    response::document(UserResponse::from(&user))
}

/// PATCH /api/v1/users/update-me
///
/// Profile update for the logged-in account: name, email, photo. Password
/// changes are routed to `/update-password` so they cannot dodge the
/// current-password check.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<UpdateMeRequest>, AppError>,
) -> AppResult<Json<Value>> {
    if input.password.is_some() || input.password_confirm.is_some() {
        return Err(AppError::BadRequest(NOT_FOR_PASSWORDS.to_string()));
    }
    if let Some(name) = &input.name {
        validate::validate_name(name)?;
    }
    if let Some(email) = &input.email {
        validate::validate_email(email)?;
    }

    let updated = UserRepo::update_profile(
        &state.pool,
        user.id,
        input.name.as_deref(),
        input.email.as_deref(),
        input.photo.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(NO_DOCUMENT.to_string()))?;

    Ok(response::user_document(UserResponse::from(&updated)))
}

/// DELETE /api/v1/users/delete-me
///
/// Soft delete: the account is marked inactive and disappears from every
/// read path, which also kills its outstanding sessions.
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<StatusCode> {
    UserRepo::deactivate(&state.pool, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<Value>> {
    collection::list::<UserRepo>(&state, &pairs, None).await
}

/// POST /api/v1/users
///
/// Accounts are only created through signup, where a password is set.
pub async fn create_user(RequireAdmin(_admin): RequireAdmin) -> AppError {
    AppError::BadRequest(USE_SIGNUP.to_string())
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<Value>> {
    collection::get_one::<UserRepo>(&state, id, false).await
}

/// PATCH /api/v1/users/{id}
///
/// Admin update; may change role and active status, never the password.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateUser>, AppError>,
) -> AppResult<Json<Value>> {
    collection::update_one::<UserRepo>(&state, id, input).await
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<StatusCode> {
    collection::delete_one::<UserRepo>(&state, id).await
}
