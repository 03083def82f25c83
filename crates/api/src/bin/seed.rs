//! Development data loader.
//!
//! Loads the JSON fixtures under `dev-data/` into the database, or wipes the
//! seeded tables:
//!
//! ```text
//! cargo run --bin seed -- --import
//! cargo run --bin seed -- --delete
//! ```
//!
//! Every seeded account gets the password `test1234`.

use anyhow::{bail, Context};
use serde::Deserialize;
use sqlx::PgPool;

use trailhead_api::auth::password::hash_password;
use trailhead_core::roles::Role;
use trailhead_db::models::review::NewReview;
use trailhead_db::models::tour::CreateTour;
use trailhead_db::models::user::CreateUser;
use trailhead_db::repositories::{ReviewRepo, TourRepo, UserRepo};

const SEED_PASSWORD: &str = "test1234";

/// Seed user fixture; all accounts share the development password.
#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    email: String,
    #[serde(default)]
    role: Role,
}

/// Seed review fixture; `tour` and `user` are positions in the other files.
#[derive(Debug, Deserialize)]
struct SeedReview {
    review: String,
    rating: i32,
    tour: usize,
    user: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = trailhead_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    trailhead_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match std::env::args().nth(1).as_deref() {
        Some("--import") => import(&pool).await,
        Some("--delete") => delete(&pool).await,
        _ => bail!("Usage: seed --import | --delete"),
    }
}

async fn import(pool: &PgPool) -> anyhow::Result<()> {
    let users: Vec<SeedUser> = read_fixture("users")?;
    let tours: Vec<CreateTour> = read_fixture("tours")?;
    let reviews: Vec<SeedReview> = read_fixture("reviews")?;

    // One shared hash; hashing per account would only slow the import down.
    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let mut user_ids = Vec::with_capacity(users.len());
    for user in &users {
        let created = UserRepo::create(
            pool,
            &CreateUser {
                name: user.name.clone(),
                email: user.email.clone(),
                password_hash: password_hash.clone(),
                role: user.role,
            },
        )
        .await
        .with_context(|| format!("Failed to insert user '{}'", user.email))?;
        user_ids.push(created.id);
    }
    println!("Loaded {} users", user_ids.len());

    let mut tour_ids = Vec::with_capacity(tours.len());
    for tour in &tours {
        let created = TourRepo::create(pool, tour)
            .await
            .with_context(|| format!("Failed to insert tour '{}'", tour.name))?;
        tour_ids.push(created.id);
    }
    println!("Loaded {} tours", tour_ids.len());

    for (position, review) in reviews.iter().enumerate() {
        let tour_id = *tour_ids.get(review.tour).with_context(|| {
            format!("Review {position} references unknown tour index {}", review.tour)
        })?;
        let user_id = *user_ids.get(review.user).with_context(|| {
            format!("Review {position} references unknown user index {}", review.user)
        })?;

        ReviewRepo::create(
            pool,
            &NewReview {
                review: review.review.clone(),
                rating: review.rating,
                tour_id,
                user_id,
            },
        )
        .await
        .with_context(|| format!("Failed to insert review {position}"))?;
    }
    println!("Loaded {} reviews", reviews.len());

    Ok(())
}

async fn delete(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("TRUNCATE reviews, tours, users RESTART IDENTITY")
        .execute(pool)
        .await
        .context("Failed to truncate tables")?;
    println!("Deleted all users, tours, and reviews");
    Ok(())
}

fn read_fixture<T: serde::de::DeserializeOwned>(name: &str) -> anyhow::Result<Vec<T>> {
    let data_dir = std::env::var("SEED_DATA_DIR").unwrap_or_else(|_| "dev-data".into());
    let path = std::path::Path::new(&data_dir).join(format!("{name}.json"));
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
