use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{auth, users};
use crate::state::AppState;

/// Account and user administration routes.
///
/// ```text
/// POST   /signup                  -> signup           (public)
/// POST   /login                   -> login            (public)
/// GET    /logout                  -> logout           (public)
/// POST   /forgot-password         -> forgot_password  (public)
/// PATCH  /reset-password/{token}  -> reset_password   (public)
/// PATCH  /update-password         -> update_password  (auth)
/// GET    /me                      -> me               (auth)
/// PATCH  /update-me               -> update_me        (auth)
/// DELETE /delete-me               -> delete_me        (auth)
/// GET    /                        -> list_users       (admin)
/// POST   /                        -> create_user      (admin, stub)
/// GET    /{id}                    -> get_user         (admin)
/// PATCH  /{id}                    -> update_user      (admin)
/// DELETE /{id}                    -> delete_user      (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/{token}", patch(auth::reset_password))
        .route("/update-password", patch(auth::update_password))
        .route("/me", get(users::me))
        .route("/update-me", patch(users::update_me))
        .route("/delete-me", delete(users::delete_me))
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
