//! Repository for the `tours` table.

use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::query::QuerySpec;
use trailhead_core::text::slugify;
use trailhead_core::types::DbId;

use crate::models::tour::{CreateTour, Tour, TourStats, UpdateTour};
use crate::repositories::review_repo::ReviewRepo;
use crate::select::{self, ColumnKind, EntityFields, FieldDef, ScopeFilter};
use crate::store::{Collection, StoreError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, duration, max_group_size, difficulty, price, discount, \
                       ratings_average, ratings_quantity, summary, description, image_cover, \
                       images, start_dates, secret, start_location, locations, guides, \
                       created_at, updated_at";

/// Filter/sort whitelist for `GET /api/v1/tours`. Secret tours are hidden
/// from every read path.
const FIELDS: EntityFields = EntityFields {
    from: "tours",
    columns: COLUMNS,
    fields: &[
        FieldDef {
            name: "name",
            column: "name",
            kind: ColumnKind::Text,
        },
        FieldDef {
            name: "duration",
            column: "duration",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "max_group_size",
            column: "max_group_size",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "difficulty",
            column: "difficulty",
            kind: ColumnKind::Text,
        },
        FieldDef {
            name: "price",
            column: "price",
            kind: ColumnKind::Float,
        },
        FieldDef {
            name: "ratings_average",
            column: "ratings_average",
            kind: ColumnKind::Float,
        },
        FieldDef {
            name: "ratings_quantity",
            column: "ratings_quantity",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "created_at",
            column: "created_at",
            kind: ColumnKind::Timestamp,
        },
    ],
    default_sort: "created_at DESC",
    base_where: Some("secret = FALSE"),
};

/// Provides CRUD operations and catalog statistics for tours.
pub struct TourRepo;

impl TourRepo {
    /// Insert a new tour, returning the created row. The slug is derived
    /// from the name.
    pub async fn create(pool: &PgPool, input: &CreateTour) -> Result<Tour, sqlx::Error> {
        let query = format!(
            "INSERT INTO tours (name, slug, duration, max_group_size, difficulty, price, \
                                discount, summary, description, image_cover, images, \
                                start_dates, secret, start_location, locations, guides)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(&input.name)
            .bind(slugify(&input.name))
            .bind(input.duration)
            .bind(input.max_group_size)
            .bind(input.difficulty.as_str())
            .bind(input.price)
            .bind(input.discount)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(&input.image_cover)
            .bind(&input.images)
            .bind(&input.start_dates)
            .bind(input.secret)
            .bind(&input.start_location)
            .bind(&input.locations)
            .bind(&input.guides)
            .fetch_one(pool)
            .await
    }

    /// Find a non-secret tour by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tours WHERE id = $1 AND secret = FALSE");
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-secret tour by its URL slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tour>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tours WHERE slug = $1 AND secret = FALSE");
        sqlx::query_as::<_, Tour>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List tours matching `spec`.
    pub async fn list(
        pool: &PgPool,
        spec: &QuerySpec,
        scope: Option<&ScopeFilter>,
    ) -> Result<Vec<Tour>, StoreError> {
        let query = select::build_list_query(&FIELDS, spec, scope)?;
        let rows = select::bind_all(sqlx::query_as::<_, Tour>(&query.sql), &query.binds)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Update a tour. Only non-`None` fields in `input` are applied; a name
    /// change regenerates the slug.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTour,
    ) -> Result<Option<Tour>, sqlx::Error> {
        let slug = input.name.as_deref().map(slugify);
        let query = format!(
            "UPDATE tours SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                duration = COALESCE($4, duration),
                max_group_size = COALESCE($5, max_group_size),
                difficulty = COALESCE($6, difficulty),
                price = COALESCE($7, price),
                discount = COALESCE($8, discount),
                summary = COALESCE($9, summary),
                description = COALESCE($10, description),
                image_cover = COALESCE($11, image_cover),
                images = COALESCE($12, images),
                start_dates = COALESCE($13, start_dates),
                secret = COALESCE($14, secret),
                start_location = COALESCE($15, start_location),
                locations = COALESCE($16, locations),
                guides = COALESCE($17, guides),
                updated_at = NOW()
             WHERE id = $1 AND secret = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(input.duration)
            .bind(input.max_group_size)
            .bind(input.difficulty.map(|d| d.as_str()))
            .bind(input.price)
            .bind(input.discount)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(&input.image_cover)
            .bind(&input.images)
            .bind(&input.start_dates)
            .bind(input.secret)
            .bind(&input.start_location)
            .bind(&input.locations)
            .bind(&input.guides)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tour. Returns `true` if a visible row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1 AND secret = FALSE")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Catalog statistics per difficulty, over well-rated tours.
    pub async fn stats(pool: &PgPool) -> Result<Vec<TourStats>, sqlx::Error> {
        sqlx::query_as::<_, TourStats>(
            "SELECT difficulty,
                    COUNT(*) AS num_tours,
                    SUM(ratings_quantity) AS num_ratings,
                    AVG(ratings_average) AS avg_rating,
                    AVG(price) AS avg_price,
                    MIN(price) AS min_price,
                    MAX(price) AS max_price
             FROM tours
             WHERE secret = FALSE AND ratings_average >= 4.5
             GROUP BY difficulty
             ORDER BY avg_price",
        )
        .fetch_all(pool)
        .await
    }
}

impl Collection for TourRepo {
    type Entity = Tour;
    type Create = CreateTour;
    type Update = UpdateTour;

    const ENTITY: &'static str = "Tour";

    fn fields() -> &'static EntityFields {
        &FIELDS
    }

    async fn find(
        pool: &PgPool,
        spec: &QuerySpec,
        scope: Option<&ScopeFilter>,
    ) -> Result<Vec<Tour>, StoreError> {
        TourRepo::list(pool, spec, scope).await
    }

    async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tour>, StoreError> {
        Ok(TourRepo::find_by_id(pool, id).await?)
    }

    async fn create(pool: &PgPool, input: &CreateTour) -> Result<Tour, StoreError> {
        Ok(TourRepo::create(pool, input).await?)
    }

    async fn update_by_id(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTour,
    ) -> Result<Option<Tour>, StoreError> {
        Ok(TourRepo::update(pool, id, input).await?)
    }

    async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        Ok(TourRepo::delete(pool, id).await?)
    }

    /// Embed the tour's reviews, newest first.
    async fn populate(pool: &PgPool, doc: &mut serde_json::Value) -> Result<(), StoreError> {
        let Some(id) = doc.get("id").and_then(|v| v.as_i64()) else {
            return Ok(());
        };
        let reviews = ReviewRepo::find_by_tour(pool, id).await?;
        let value = serde_json::to_value(reviews)
            .map_err(|e| StoreError::Query(CoreError::Internal(e.to_string())))?;
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("reviews".to_string(), value);
        }
        Ok(())
    }
}
