//! Application error type and the single JSON error responder.
//!
//! Every failure in the API funnels through [`AppError::into_response`],
//! which maps the error kind to a status code and a client-safe message in
//! the standard envelope: `{"status": "fail" | "error", "message": ...}`.
//! `fail` marks client mistakes (4xx), `error` marks server trouble (5xx).

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use trailhead_core::error::CoreError;
use trailhead_db::store::StoreError;

/// Message used for every missing-document read, regardless of entity.
pub const NO_DOCUMENT: &str = "No document found with that ID";

/// Client-facing message for unexpected server-side failures. The real cause
/// goes to the log, never to the wire.
pub const SOMETHING_WRONG: &str = "Something went very wrong";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `trailhead_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource or unroutable path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Outbound email dispatch failed. Operational: the message is shown to
    /// the client even though the status is 500.
    #[error("Email dispatch failed: {0}")]
    Mail(String),

    /// An internal error with a message that must not reach the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Query(core) => AppError::Core(core),
            StoreError::Database(db) => AppError::Database(db),
        }
    }
}

// Body and path rejections would otherwise bypass the envelope as plain-text
// responses; `WithRejection` in the handlers routes them through here.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Core(core) => core_response(core),
            AppError::Database(db) => database_response(db),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Mail(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::InternalError(message) => {
                tracing::error!(error = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SOMETHING_WRONG.to_string(),
                )
            }
        };

        let indicator = if status.is_server_error() {
            "error"
        } else {
            "fail"
        };
        let body = json!({ "status": indicator, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn core_response(core: CoreError) -> (StatusCode, String) {
    match core {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, NO_DOCUMENT.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        CoreError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SOMETHING_WRONG.to_string(),
            )
        }
    }
}

/// Translate a database failure into a client-facing status and message.
///
/// Constraint violations become 400s naming the broken rule; everything else
/// is logged and sanitized to a generic 500.
fn database_response(err: sqlx::Error) -> (StatusCode, String) {
    match &err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, NO_DOCUMENT.to_string()),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // unique_violation
            Some("23505") => (StatusCode::BAD_REQUEST, duplicate_message(db.constraint())),
            // check_violation
            Some("23514") => (StatusCode::BAD_REQUEST, check_message(db.constraint())),
            // foreign_key_violation
            Some("23503") => (
                StatusCode::BAD_REQUEST,
                "Referenced record does not exist".to_string(),
            ),
            // not_null_violation
            Some("23502") => (
                StatusCode::BAD_REQUEST,
                "A required field is missing".to_string(),
            ),
            _ => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SOMETHING_WRONG.to_string(),
                )
            }
        },
        _ => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SOMETHING_WRONG.to_string(),
            )
        }
    }
}

fn duplicate_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("uq_users_email") => "This email address is already in use",
        Some("uq_tours_name") => "A tour with this name already exists",
        Some("uq_reviews_tour_user") => "You have already reviewed this tour",
        _ => "Duplicate field value. Please use another value",
    }
    .to_string()
}

fn check_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("ck_tours_name_length") => "A tour name must have between 10 and 40 characters",
        Some("ck_tours_ratings_average") | Some("ck_reviews_rating") => {
            "Rating must be between 1 and 5"
        }
        Some("ck_tours_discount") => "Discount price should be below regular price",
        Some("ck_tours_difficulty") => "Difficulty is either: easy, medium, difficult",
        Some("ck_users_role") => "Role is either: user, guide, lead-guide, admin",
        Some("ck_reviews_review") => "Review can not be empty",
        _ => "Invalid input data",
    }
    .to_string()
}
