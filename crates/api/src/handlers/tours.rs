//! Handlers for the `/tours` resource.
//!
//! Reads are public; catalog mutations require tour-management rights. The
//! generic CRUD plumbing does the heavy lifting, so what is left here is the
//! top-5 preset and the statistics endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use trailhead_core::types::DbId;
use trailhead_db::models::tour::{CreateTour, UpdateTour};
use trailhead_db::repositories::TourRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::collection;
use crate::middleware::rbac::RequireTourManager;
use crate::state::AppState;

/// GET /api/v1/tours
pub async fn list_tours(
    State(state): State<AppState>,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, AppError>,
) -> AppResult<Json<Value>> {
    collection::list::<TourRepo>(&state, &pairs, None).await
}

/// GET /api/v1/tours/top-5-cheap
///
/// Canned listing: the five best-rated tours, cheapest first among equals,
/// trimmed to the fields the landing page needs. Any client-supplied query
/// string is ignored.
pub async fn top_five_cheap(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let preset = [
        ("limit", "5"),
        ("sort", "-ratings_average,price"),
        ("fields", "name,price,ratings_average,summary,difficulty"),
    ];
    let pairs: Vec<(String, String)> = preset
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    collection::list::<TourRepo>(&state, &pairs, None).await
}

/// GET /api/v1/tours/stats
///
/// Aggregate catalog statistics per difficulty over well-rated tours.
pub async fn tour_stats(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let stats = TourRepo::stats(&state.pool).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "stats": stats },
    })))
}

/// GET /api/v1/tours/{id}
///
/// Single tour with its reviews embedded.
pub async fn get_tour(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<Json<Value>> {
    collection::get_one::<TourRepo>(&state, id, true).await
}

/// POST /api/v1/tours
pub async fn create_tour(
    State(state): State<AppState>,
    RequireTourManager(_manager): RequireTourManager,
    WithRejection(Json(input), _): WithRejection<Json<CreateTour>, AppError>,
) -> AppResult<(StatusCode, Json<Value>)> {
    collection::create_one::<TourRepo>(&state, input).await
}

/// PATCH /api/v1/tours/{id}
pub async fn update_tour(
    State(state): State<AppState>,
    RequireTourManager(_manager): RequireTourManager,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateTour>, AppError>,
) -> AppResult<Json<Value>> {
    collection::update_one::<TourRepo>(&state, id, input).await
}

/// DELETE /api/v1/tours/{id}
pub async fn delete_tour(
    State(state): State<AppState>,
    RequireTourManager(_manager): RequireTourManager,
    WithRejection(Path(id), _): WithRejection<Path<DbId>, AppError>,
) -> AppResult<StatusCode> {
    collection::delete_one::<TourRepo>(&state, id).await
}
