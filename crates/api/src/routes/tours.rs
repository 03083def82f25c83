use axum::{
    routing::get,
    Router,
};

use crate::handlers::{reviews, tours};
use crate::state::AppState;

/// Tour catalog routes.
///
/// ```text
/// GET    /              -> list_tours        (public)
/// POST   /              -> create_tour       (lead-guide, admin)
/// GET    /top-5-cheap   -> top_five_cheap    (public)
/// GET    /stats         -> tour_stats        (public)
/// GET    /{id}          -> get_tour          (public)
/// PATCH  /{id}          -> update_tour       (lead-guide, admin)
/// DELETE /{id}          -> delete_tour       (lead-guide, admin)
/// GET    /{id}/reviews  -> list_for_tour     (auth)
/// POST   /{id}/reviews  -> create_for_tour   (customers)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tours::list_tours).post(tours::create_tour))
        .route("/top-5-cheap", get(tours::top_five_cheap))
        .route("/stats", get(tours::tour_stats))
        .route(
            "/{id}",
            get(tours::get_tour)
                .patch(tours::update_tour)
                .delete(tours::delete_tour),
        )
        .route(
            "/{id}/reviews",
            get(reviews::list_for_tour).post(reviews::create_for_tour),
        )
}
