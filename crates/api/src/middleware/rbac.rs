//! Role-based access control extractors.
//!
//! Each extractor wraps [`CurrentUser`] and rejects requests whose role does
//! not satisfy the route's policy. Authentication always runs first (a
//! missing session is a 401, a permitted session with the wrong role a 403),
//! and the ordering cannot be gotten wrong because the role check only exists
//! on top of an already-resolved account.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use trailhead_core::error::CoreError;
use trailhead_core::roles::Role;
use trailhead_db::models::user::User;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";

/// Check `policy` against an authenticated account, rejecting with 403.
pub fn authorize(user: &User, policy: fn(Role) -> bool) -> Result<(), AppError> {
    if policy(user.role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            FORBIDDEN_MESSAGE.to_string(),
        )))
    }
}

/// Requires an account that may administer users. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<Value>> {
///     // user is guaranteed to be an admin here
/// }
/// ```
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authorize(&user, Role::can_manage_users)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires an account that may manage the tour catalog (admin or lead
/// guide). Rejects with 403 otherwise.
pub struct RequireTourManager(pub User);

impl FromRequestParts<AppState> for RequireTourManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authorize(&user, Role::can_manage_tours)?;
        Ok(RequireTourManager(user))
    }
}

/// Requires a customer account, the only kind that may post reviews.
pub struct RequireCustomer(pub User);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authorize(&user, Role::can_write_reviews)?;
        Ok(RequireCustomer(user))
    }
}

/// Requires an account that may edit or delete existing reviews (the
/// reviewer population plus admins).
pub struct RequireReviewModerator(pub User);

impl FromRequestParts<AppState> for RequireReviewModerator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        authorize(&user, Role::can_moderate_reviews)?;
        Ok(RequireReviewModerator(user))
    }
}
