//! Review entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailhead_core::types::{DbId, Timestamp};

/// Review row joined with its author's public fields.
///
/// Reads always go through the `reviews JOIN users` projection so responses
/// carry the reviewer's name and photo without a second round trip.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: DbId,
    pub review: String,
    pub rating: i32,
    pub tour_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub user_photo: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully-resolved insert payload. `user_id` always comes from the
/// authenticated session, never from the request body.
#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub review: String,
    pub rating: i32,
    pub tour_id: DbId,
    pub user_id: DbId,
}

/// Client-facing create payload; `tour_id` may come from the nested route
/// path instead of the body.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub review: String,
    pub rating: i32,
    pub tour_id: Option<DbId>,
}

/// DTO for updating an existing review. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateReview {
    pub review: Option<String>,
    pub rating: Option<i32>,
}
