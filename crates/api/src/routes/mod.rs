pub mod health;
pub mod reviews;
pub mod tours;
pub mod users;
pub mod views;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tours                         list (public) | create (lead-guide, admin)
/// /tours/top-5-cheap             best-rated preset listing (public)
/// /tours/stats                   catalog statistics (public)
/// /tours/{id}                    get (public) | update, delete (lead-guide, admin)
/// /tours/{id}/reviews            list (auth) | create (customers)
///
/// /users/signup                  create account (public)
/// /users/login                   login (public)
/// /users/logout                  clear the session cookie (public)
/// /users/forgot-password         request a reset token (public)
/// /users/reset-password/{token}  redeem a reset token (public)
/// /users/update-password         change own password (auth)
/// /users/me                      own profile (auth)
/// /users/update-me               update own profile (auth)
/// /users/delete-me               deactivate own account (auth)
/// /users                         list (admin); create is a signup stub
/// /users/{id}                    get, update, delete (admin)
///
/// /reviews                       list (auth) | create (customers)
/// /reviews/{id}                  get (auth) | update, delete (customers, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tours", tours::router())
        .nest("/users", users::router())
        .nest("/reviews", reviews::router())
}
