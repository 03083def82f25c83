//! Repository for the `users` table.

use sqlx::PgPool;
use trailhead_core::query::QuerySpec;
use trailhead_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateUser, User, UserResponse};
use crate::select::{self, ColumnKind, EntityFields, FieldDef, ScopeFilter};
use crate::store::{Collection, StoreError};

/// Full column list used by authentication paths. Includes the password hash
/// and reset fields; rows read with it must never be serialized directly.
const COLUMNS: &str = "id, name, email, photo, role, password_hash, \
                       password_changed_at, password_reset_hash, password_reset_expires, \
                       active, created_at, updated_at";

/// Safe column list for collection reads.
const RESPONSE_COLUMNS: &str = "id, name, email, photo, role, active, created_at";

/// Filter/sort whitelist for `GET /api/v1/users`. Deactivated accounts are
/// hidden from every list, admin or not.
const FIELDS: EntityFields = EntityFields {
    from: "users",
    columns: RESPONSE_COLUMNS,
    fields: &[
        FieldDef {
            name: "name",
            column: "name",
            kind: ColumnKind::Text,
        },
        FieldDef {
            name: "email",
            column: "email",
            kind: ColumnKind::Text,
        },
        FieldDef {
            name: "role",
            column: "role",
            kind: ColumnKind::Text,
        },
        FieldDef {
            name: "created_at",
            column: "created_at",
            kind: ColumnKind::Timestamp,
        },
    ],
    default_sort: "created_at DESC",
    base_where: Some("active = TRUE"),
};

/// Provides CRUD and credential operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row. Emails are stored
    /// lowercased so the unique index is case-insensitive in practice.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role, password_hash)
             VALUES ($1, LOWER($2), $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.as_str())
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID, including credential fields. Deactivated
    /// accounts resolve to `None`, which also invalidates their tokens.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND active = TRUE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, including credential fields. Deactivated
    /// accounts resolve to `None`, so they cannot log in or request resets.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1) AND active = TRUE");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the user holding an unexpired reset token hash.
    pub async fn find_by_reset_hash(
        pool: &PgPool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE password_reset_hash = $1 AND password_reset_expires > $2
               AND active = TRUE"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Store or clear the password-reset token hash and expiry.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        hash: Option<&str>,
        expires: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_reset_hash = $2, password_reset_expires = $3,
                              updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .bind(expires)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the password hash, stamp the change, and clear any pending
    /// reset token.
    ///
    /// The change timestamp is backdated one second so a session token minted
    /// in the same instant is not mistaken for stale.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_hash = $2,
                              password_changed_at = NOW() - INTERVAL '1 second',
                              password_reset_hash = NULL,
                              password_reset_expires = NULL,
                              updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Self-service profile update (name/email/photo only). Only non-`None`
    /// fields are applied. Returns `None` if no row with `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        email: Option<&str>,
        photo: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE(LOWER($3), email),
                photo = COALESCE($4, photo),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(photo)
            .fetch_optional(pool)
            .await
    }

    /// Administrative update. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE(LOWER($3), email),
                photo = COALESCE($4, photo),
                role = COALESCE($5, role),
                active = COALESCE($6, active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.photo)
            .bind(input.role.map(|r| r.as_str()))
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate an account. The row survives but disappears from all
    /// read paths. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET active = FALSE, updated_at = NOW()
             WHERE id = $1 AND active = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl Collection for UserRepo {
    type Entity = UserResponse;
    type Create = CreateUser;
    type Update = UpdateUser;

    const ENTITY: &'static str = "User";

    fn fields() -> &'static EntityFields {
        &FIELDS
    }

    async fn find(
        pool: &PgPool,
        spec: &QuerySpec,
        scope: Option<&ScopeFilter>,
    ) -> Result<Vec<UserResponse>, StoreError> {
        let query = select::build_list_query(&FIELDS, spec, scope)?;
        let rows = select::bind_all(sqlx::query_as::<_, UserResponse>(&query.sql), &query.binds)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserResponse>, StoreError> {
        let query =
            format!("SELECT {RESPONSE_COLUMNS} FROM users WHERE id = $1 AND active = TRUE");
        Ok(sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    async fn create(pool: &PgPool, input: &CreateUser) -> Result<UserResponse, StoreError> {
        let user = UserRepo::create(pool, input).await?;
        Ok(UserResponse::from(&user))
    }

    async fn update_by_id(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<UserResponse>, StoreError> {
        Ok(UserRepo::update(pool, id, input).await?)
    }

    async fn delete_by_id(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        Ok(UserRepo::delete(pool, id).await?)
    }
}
