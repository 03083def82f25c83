//! Entity-agnostic storage capability behind the generic CRUD handlers.
//!
//! Each entity repository implements [`Collection`]; the API crate's generic
//! handlers are written once against this trait and instantiated per entity
//! with static dispatch. Methods return [`StoreError`] so a rejected filter
//! field and a database failure travel the same channel.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use trailhead_core::error::CoreError;
use trailhead_core::query::QuerySpec;
use trailhead_core::types::DbId;

use crate::select::{EntityFields, ScopeFilter};

/// Errors surfaced by the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request's query options were rejected by the whitelist.
    #[error(transparent)]
    Query(#[from] CoreError),

    /// A database error from sqlx.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The capability set a generic CRUD surface needs from one entity.
pub trait Collection {
    /// Row type returned by reads.
    type Entity: Serialize + Send + Sync + Unpin;
    /// Insert payload.
    type Create: DeserializeOwned + Send + Sync;
    /// Patch payload; all fields optional.
    type Update: DeserializeOwned + Send + Sync;

    /// Singular display name used in not-found messages ("Tour", "Review").
    const ENTITY: &'static str;

    /// Filter/sort whitelist and projection for list queries.
    fn fields() -> &'static EntityFields;

    /// List rows matching `spec`, optionally restricted to a parent scope.
    fn find(
        pool: &PgPool,
        spec: &QuerySpec,
        scope: Option<&ScopeFilter>,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, StoreError>> + Send;

    /// Fetch one row by id.
    fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Self::Entity>, StoreError>> + Send;

    /// Insert a new row, returning it.
    fn create(
        pool: &PgPool,
        input: &Self::Create,
    ) -> impl Future<Output = Result<Self::Entity, StoreError>> + Send;

    /// Patch a row by id, returning the new state, or `None` if absent.
    fn update_by_id(
        pool: &PgPool,
        id: DbId,
        input: &Self::Update,
    ) -> impl Future<Output = Result<Option<Self::Entity>, StoreError>> + Send;

    /// Delete a row by id. Returns `false` if absent.
    fn delete_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Attach related records to a single serialized entity before it is
    /// returned. Default: leave the document untouched.
    fn populate(
        _pool: &PgPool,
        _doc: &mut serde_json::Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        std::future::ready(Ok::<(), StoreError>(()))
    }
}
