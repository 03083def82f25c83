//! Repository for the `reviews` table.
//!
//! Reads join the author's public fields; every mutation recomputes the
//! parent tour's denormalized rating aggregates.

use sqlx::PgPool;
use trailhead_core::query::QuerySpec;
use trailhead_core::types::DbId;

use crate::models::review::{NewReview, Review, UpdateReview};
use crate::select::{self, ColumnKind, EntityFields, FieldDef, ScopeFilter};
use crate::store::{Collection, StoreError};

/// Joined column list shared across queries.
const COLUMNS: &str = "r.id, r.review, r.rating, r.tour_id, r.user_id, \
                       u.name AS user_name, u.photo AS user_photo, \
                       r.created_at, r.updated_at";

/// FROM clause resolving the review author.
const FROM: &str = "reviews r JOIN users u ON u.id = r.user_id";

/// Filter/sort whitelist for review lists.
const FIELDS: EntityFields = EntityFields {
    from: FROM,
    columns: COLUMNS,
    fields: &[
        FieldDef {
            name: "rating",
            column: "r.rating",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "tour_id",
            column: "r.tour_id",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "user_id",
            column: "r.user_id",
            kind: ColumnKind::Int,
        },
        FieldDef {
            name: "created_at",
            column: "r.created_at",
            kind: ColumnKind::Timestamp,
        },
    ],
    default_sort: "r.created_at DESC",
    base_where: None,
};

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Scope restricting a review list to one tour, for the nested route.
    pub fn tour_scope(tour_id: DbId) -> ScopeFilter {
        ScopeFilter {
            column: "r.tour_id",
            id: tour_id,
        }
    }

    /// Insert a new review and refresh the tour's rating aggregates.
    pub async fn create(pool: &PgPool, input: &NewReview) -> Result<Review, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO reviews (review, rating, tour_id, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.review)
        .bind(input.rating)
        .bind(input.tour_id)
        .bind(input.user_id)
        .fetch_one(pool)
        .await?;

        Self::recalculate_tour_ratings(pool, input.tour_id).await?;

        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a review by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All reviews for one tour, newest first.
    pub async fn find_by_tour(pool: &PgPool, tour_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM {FROM} WHERE r.tour_id = $1 ORDER BY r.created_at DESC");
        sqlx::query_as::<_, Review>(&query)
            .bind(tour_id)
            .fetch_all(pool)
            .await
    }

    /// Update a review. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let tour_id: Option<DbId> = sqlx::query_scalar(
            "UPDATE reviews SET review = COALESCE($2, review),
                                rating = COALESCE($3, rating),
                                updated_at = NOW()
             WHERE id = $1
             RETURNING tour_id",
        )
        .bind(id)
        .bind(&input.review)
        .bind(input.rating)
        .fetch_optional(pool)
        .await?;

        let Some(tour_id) = tour_id else {
            return Ok(None);
        };
        Self::recalculate_tour_ratings(pool, tour_id).await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete a review. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let tour_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM reviews WHERE id = $1 RETURNING tour_id")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        match tour_id {
            Some(tour_id) => {
                Self::recalculate_tour_ratings(pool, tour_id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Recompute the tour's denormalized rating aggregates. The average is
    /// kept to one decimal; a tour with no reviews falls back to the catalog
    /// default of 4.5.
    async fn recalculate_tour_ratings(pool: &PgPool, tour_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tours SET
                ratings_quantity = sub.cnt,
                ratings_average = COALESCE(sub.avg, 4.5),
                updated_at = NOW()
             FROM (SELECT COUNT(*)::INT AS cnt,
                          ROUND(AVG(rating)::numeric, 1)::DOUBLE PRECISION AS avg
                   FROM reviews WHERE tour_id = $1) sub
             WHERE tours.id = $1",
        )
        .bind(tour_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

impl Collection for ReviewRepo {
    type Entity = Review;
    type Create = NewReview;
    type Update = UpdateReview;

    const ENTITY: &'static str = "Review";

    fn fields() -> &'static EntityFields {
        &FIELDS
    }

    async fn find(
        pool: &PgPool,
        spec: &QuerySpec,
        scope: Option<&ScopeFilter>,
    ) -> Result<Vec<Review>, StoreError> {
        let query = select::build_list_query(&FIELDS, spec, scope)?;
        let rows = select::bind_all(sqlx::query_as::<_, Review>(&query.sql), &query.binds)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, StoreError> {
        Ok(ReviewRepo::find_by_id(pool, id).await?)
    }

    async fn create(pool: &PgPool, input: &NewReview) -> Result<Review, StoreError> {
        Ok(ReviewRepo::create(pool, input).await?)
    }

    async fn update_by_id(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, StoreError> {
        Ok(ReviewRepo::update(pool, id, input).await?)
    }

    async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        Ok(ReviewRepo::delete(pool, id).await?)
    }
}
