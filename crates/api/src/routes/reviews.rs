use axum::{
    routing::get,
    Router,
};

use crate::handlers::reviews;
use crate::state::AppState;

/// Review routes (tour-nested listing and creation live under `/tours`).
///
/// ```text
/// GET    /       -> list_reviews   (auth)
/// POST   /       -> create_review  (customers)
/// GET    /{id}   -> get_review     (auth)
/// PATCH  /{id}   -> update_review  (customers, admin)
/// DELETE /{id}   -> delete_review  (customers, admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/{id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
}
