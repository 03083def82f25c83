use std::sync::Arc;

use crate::config::ServerConfig;
use crate::email::Mailer;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: trailhead_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Outbound mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<Mailer>>,
    /// Per-IP sliding-window counters for the API rate limit.
    pub rate_limiter: Arc<RateLimiter>,
}
