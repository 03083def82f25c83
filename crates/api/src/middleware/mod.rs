//! Request-pipeline stages: authentication, authorization, rate limiting,
//! and per-request time capture.

pub mod auth;
pub mod rate_limit;
pub mod rbac;
pub mod request_time;
