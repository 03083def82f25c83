//! Server-rendered HTML pages: tour overview, tour detail, login form, and
//! the account page.
//!
//! Pages are assembled from small `format!` fragments with a shared layout;
//! all interpolated data goes through [`escape`]. Public pages personalize
//! the navigation when a session cookie resolves, via [`MaybeUser`].

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use trailhead_core::query::QuerySpec;
use trailhead_core::validate;
use trailhead_db::models::review::Review;
use trailhead_db::models::tour::Tour;
use trailhead_db::models::user::User;
use trailhead_db::repositories::{ReviewRepo, TourRepo, UserRepo};

use crate::error::{AppError, AppResult, NO_DOCUMENT};
use crate::middleware::auth::{CurrentUser, MaybeUser};
use crate::state::AppState;

const NO_TOUR_WITH_NAME: &str = "There is no tour with that name";

/// Form body for `POST /submit-user-data` (the no-JavaScript fallback on the
/// account page).
#[derive(Debug, Deserialize)]
pub struct UserDataForm {
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// GET /
pub async fn overview(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Html<String>> {
    let tours = TourRepo::list(&state.pool, &QuerySpec::default(), None).await?;
    let cards: String = tours.iter().map(tour_card).collect();
    Ok(layout(
        "All tours",
        user.as_ref(),
        &format!("<h1>All tours</h1>\n{cards}"),
    ))
}

/// GET /tour/{slug}
pub async fn tour(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let tour = TourRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_TOUR_WITH_NAME.to_string()))?;
    let reviews = ReviewRepo::find_by_tour(&state.pool, tour.id).await?;

    let review_items: String = reviews.iter().map(review_item).collect();
    let body = format!(
        "<h1>{name}</h1>\n\
         <p>{summary}</p>\n\
         <p>{duration} days &middot; {difficulty} &middot; up to {group} people</p>\n\
         <p>${price:.2}</p>\n\
         <p>{description}</p>\n\
         <section><h2>Reviews ({count})</h2>\n{review_items}</section>",
        name = escape(&tour.name),
        summary = escape(&tour.summary),
        duration = tour.duration,
        difficulty = tour.difficulty,
        group = tour.max_group_size,
        price = tour.price,
        description = escape(tour.description.as_deref().unwrap_or("")),
        count = tour.ratings_quantity,
    );
    Ok(layout(&tour.name, user.as_ref(), &body))
}

/// GET /login
pub async fn login_form(MaybeUser(user): MaybeUser) -> Html<String> {
    let body = "<h1>Log into your account</h1>\n\
         <form method=\"post\" action=\"/api/v1/users/login\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>";
    layout("Log in", user.as_ref(), body)
}

/// GET /me
pub async fn account(CurrentUser(user): CurrentUser) -> Html<String> {
    account_page(&user)
}

/// POST /submit-user-data
///
/// Plain form submission from the account page; updates name and email, then
/// re-renders the page with the new values.
pub async fn submit_user_data(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Form(input), _): WithRejection<Form<UserDataForm>, AppError>,
) -> AppResult<Html<String>> {
    validate::validate_name(&input.name)?;
    validate::validate_email(&input.email)?;

    let updated = UserRepo::update_profile(
        &state.pool,
        user.id,
        Some(&input.name),
        Some(&input.email),
        None,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(NO_DOCUMENT.to_string()))?;

    Ok(account_page(&updated))
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

fn account_page(user: &User) -> Html<String> {
    let body = format!(
        "<h1>Your account</h1>\n\
         <form method=\"post\" action=\"/submit-user-data\">\n\
         <label>Name <input type=\"text\" name=\"name\" value=\"{name}\" required></label>\n\
         <label>Email <input type=\"email\" name=\"email\" value=\"{email}\" required></label>\n\
         <button type=\"submit\">Save settings</button>\n\
         </form>",
        name = escape(&user.name),
        email = escape(&user.email),
    );
    layout("Your account", Some(user), &body)
}

fn tour_card(tour: &Tour) -> String {
    format!(
        "<article>\n\
         <h3><a href=\"/tour/{slug}\">{name}</a></h3>\n\
         <p>{summary}</p>\n\
         <p>{duration} days &middot; {difficulty} &middot; \
         ${price:.2} &middot; {rating:.1}/5 ({count})</p>\n\
         </article>\n",
        slug = escape(&tour.slug),
        name = escape(&tour.name),
        summary = escape(&tour.summary),
        duration = tour.duration,
        difficulty = tour.difficulty,
        price = tour.price,
        rating = tour.ratings_average,
        count = tour.ratings_quantity,
    )
}

fn review_item(review: &Review) -> String {
    format!(
        "<article>\n<p>{text}</p>\n<p>{author}, {rating}/5</p>\n</article>\n",
        text = escape(&review.review),
        author = escape(&review.user_name),
        rating = review.rating,
    )
}

/// Wrap page content in the shared document shell, with the navigation
/// reflecting the session state.
fn layout(title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let nav_account = match user {
        Some(user) => format!("<a href=\"/me\">{}</a>", escape(&user.name)),
        None => "<a href=\"/login\">Log in</a>".to_string(),
    };
    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | Trailhead</title></head>\n\
         <body>\n\
         <nav><a href=\"/\">Trailhead</a> {nav_account}</nav>\n\
         <main>\n{body}\n</main>\n\
         </body>\n\
         </html>",
        title = escape(title),
    ))
}

/// Minimal HTML entity escaping for interpolated text and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
