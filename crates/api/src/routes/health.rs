use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use trailhead_core::types::Timestamp;

use crate::middleware::request_time::RequestTime;
use crate::state::AppState;

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub requested_at: Timestamp,
}

/// Health check handler reporting service and database status.
async fn health_check(
    State(state): State<AppState>,
    Extension(RequestTime(requested_at)): Extension<RequestTime>,
) -> Json<HealthResponse> {
    let db_healthy = trailhead_db::health_check(&state.pool).await.is_ok();
    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        requested_at,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
