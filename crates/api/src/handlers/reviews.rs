//! Handlers for the `/reviews` resource, flat and nested under a tour.
//!
//! Every review route requires a logged-in caller. Creation additionally
//! requires a customer account, and the author is always the authenticated
//! account, never a body field. Moderation (edit/delete) is open to the
//! reviewer population and admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde_json::Value;
use trailhead_core::types::DbId;
use trailhead_db::models::review::{CreateReview, NewReview, UpdateReview};
use trailhead_db::models::user::User;
use trailhead_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::collection;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{RequireCustomer, RequireReviewModerator};
use crate::state::AppState;

const REVIEW_NEEDS_TOUR: &str = "A review must belong to a tour";

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<Value>> {
    collection::list::<ReviewRepo>(&state, &pairs, None).await
}

/// GET /api/v1/tours/{tour_id}/reviews
pub async fn list_for_tour(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    WithRejection(Path(tour_id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<Value>> {
    collection::list::<ReviewRepo>(&state, &pairs, Some(ReviewRepo::tour_scope(tour_id))).await
}

/// POST /api/v1/reviews
///
/// The body must name the tour being reviewed.
pub async fn create_review(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    WithRejection(Json(input), _): WithRejection<Json<CreateReview>, AppError>,
) -> AppResult<(StatusCode, Json<Value>)> {
    create_common(&state, &user, input, None).await
}

/// POST /api/v1/tours/{tour_id}/reviews
///
/// Nested creation: the tour comes from the path unless the body names one.
pub async fn create_for_tour(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    WithRejection(Path(tour_id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<CreateReview>, AppError>,
) -> AppResult<(StatusCode, Json<Value>)> {
    create_common(&state, &user, input, Some(tour_id)).await
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<Value>> {
    collection::get_one::<ReviewRepo>(&state, id, false).await
}

/// PATCH /api/v1/reviews/{id}
pub async fn update_review(
    State(state): State<AppState>,
    RequireReviewModerator(_moderator): RequireReviewModerator,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateReview>, AppError>,
) -> AppResult<Json<Value>> {
    collection::update_one::<ReviewRepo>(&state, id, input).await
}

/// DELETE /api/v1/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    RequireReviewModerator(_moderator): RequireReviewModerator,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<StatusCode> {
    collection::delete_one::<ReviewRepo>(&state, id).await
}

/// Resolve the target tour and author, then insert.
async fn create_common(
    state: &AppState,
    user: &User,
    input: CreateReview,
    path_tour: Option<DbId>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let Some(tour_id) = input.tour_id.or(path_tour) else {
        return Err(AppError::BadRequest(REVIEW_NEEDS_TOUR.to_string()));
    };

    let new_review = NewReview {
        review: input.review,
        rating: input.rating,
        tour_id,
        user_id: user.id,
    };
    collection::create_one::<ReviewRepo>(state, new_review).await
}
