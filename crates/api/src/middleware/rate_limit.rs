//! Per-IP sliding-window rate limiting for the API prefix.
//!
//! Counters live in process memory: each client IP maps to the timestamps of
//! its requests inside the current window. This resets on restart and is not
//! shared across replicas, which is acceptable for its purpose of blunting
//! brute-force and scripted abuse.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use trailhead_core::error::CoreError;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again in an hour";

/// Map size beyond which idle IPs are swept out.
const SWEEP_THRESHOLD: usize = 1024;

/// Sliding-window request counters keyed by client IP.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `ip`. Returns `false` when the window quota is
    /// already spent, in which case the request is not recorded.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        // A poisoned lock only means another request panicked mid-update;
        // the counters are still usable.
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        let entries = hits.entry(ip).or_default();
        entries.retain(|hit| now.duration_since(*hit) < self.window);
        if entries.len() >= self.max_requests {
            return false;
        }
        entries.push(now);

        if hits.len() >= SWEEP_THRESHOLD {
            hits.retain(|_, entries| {
                entries.retain(|hit| now.duration_since(*hit) < self.window);
                !entries.is_empty()
            });
        }

        true
    }
}

/// Middleware enforcing the limiter; rejects with 429 once over quota.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_addr(&request);
    if !state.rate_limiter.check(ip) {
        return Err(AppError::Core(CoreError::TooManyRequests(
            RATE_LIMIT_MESSAGE.to_string(),
        )));
    }
    Ok(next.run(request).await)
}

/// Client IP for quota accounting: the first `X-Forwarded-For` hop when a
/// proxy supplied one, otherwise the socket peer address.
fn client_addr(request: &Request) -> IpAddr {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|value| value.trim().parse::<IpAddr>().ok());
    if let Some(ip) = forwarded {
        return ip;
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
