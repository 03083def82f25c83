use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::views;
use crate::state::AppState;

/// Server-rendered pages, mounted at the site root rather than `/api/v1`.
///
/// ```text
/// GET  /                  -> overview
/// GET  /tour/{slug}       -> tour
/// GET  /login             -> login_form
/// GET  /me                -> account          (auth)
/// POST /submit-user-data  -> submit_user_data (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(views::overview))
        .route("/tour/{slug}", get(views::tour))
        .route("/login", get(views::login_form))
        .route("/me", get(views::account))
        .route("/submit-user-data", post(views::submit_user_data))
}
