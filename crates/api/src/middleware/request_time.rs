//! Per-request wall-clock capture.
//!
//! The arrival time is attached to the request as an extension rather than
//! read ad hoc inside handlers, so everything that reports about one request
//! agrees on when it happened.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use trailhead_core::types::Timestamp;

/// Wall-clock instant at which the request entered the middleware stack.
///
/// Handlers read it with `Extension<RequestTime>`.
#[derive(Debug, Clone, Copy)]
pub struct RequestTime(pub Timestamp);

/// Stamp the arrival time onto the request.
pub async fn stamp(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(RequestTime(chrono::Utc::now()));
    next.run(request).await
}
