//! Generic CRUD plumbing over the [`Collection`] capability.
//!
//! Each function here is written once and instantiated per entity by the
//! resource handlers, which own request extraction and access guards. List
//! reads parse the query string into a [`QuerySpec`], execute it through the
//! whitelisted storage adapter, and apply field projection to the serialized
//! documents before wrapping them in the response envelope.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use trailhead_core::error::CoreError;
use trailhead_core::query::QuerySpec;
use trailhead_core::types::DbId;
use trailhead_db::select::ScopeFilter;
use trailhead_db::store::Collection;

use crate::error::{AppError, AppResult};
use crate::response;
use crate::state::AppState;

/// List documents matching the raw query-string `pairs`, optionally scoped
/// to a parent entity (nested routes).
pub async fn list<C: Collection>(
    state: &AppState,
    pairs: &[(String, String)],
    scope: Option<ScopeFilter>,
) -> AppResult<Json<Value>> {
    let spec = QuerySpec::parse(pairs)?;
    let docs = C::find(&state.pool, &spec, scope.as_ref()).await?;
    let docs = serialize_docs(&docs, &spec.fields)?;
    Ok(response::collection(docs))
}

/// Fetch one document by id; 404 when it does not exist. `populate` attaches
/// the entity's related records.
pub async fn get_one<C: Collection>(
    state: &AppState,
    id: DbId,
    populate: bool,
) -> AppResult<Json<Value>> {
    let doc = C::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<C>(id))?;

    let mut value = to_value(&doc)?;
    if populate {
        C::populate(&state.pool, &mut value).await?;
    }
    Ok(response::document(value))
}

/// Insert a new document, returning it with 201.
pub async fn create_one<C: Collection>(
    state: &AppState,
    input: C::Create,
) -> AppResult<(StatusCode, Json<Value>)> {
    let doc = C::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, response::document(doc)))
}

/// Patch a document by id, returning the new state; 404 when absent.
pub async fn update_one<C: Collection>(
    state: &AppState,
    id: DbId,
    input: C::Update,
) -> AppResult<Json<Value>> {
    let doc = C::update_by_id(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found::<C>(id))?;
    Ok(response::document(doc))
}

/// Delete a document by id; 204 with an empty body, 404 when absent.
pub async fn delete_one<C: Collection>(state: &AppState, id: DbId) -> AppResult<StatusCode> {
    if !C::delete_by_id(&state.pool, id).await? {
        return Err(not_found::<C>(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found<C: Collection>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: C::ENTITY,
        id,
    })
}

fn serialize_docs<T: Serialize>(docs: &[T], fields: &[String]) -> AppResult<Vec<Value>> {
    docs.iter()
        .map(|doc| {
            let mut value = to_value(doc)?;
            project(&mut value, fields);
            Ok(value)
        })
        .collect()
}

fn to_value<T: Serialize>(doc: &T) -> AppResult<Value> {
    serde_json::to_value(doc).map_err(|e| AppError::InternalError(format!("Serialize error: {e}")))
}

/// Drop attributes not named in `fields`. The `id` always stays; names that
/// match nothing select nothing and are otherwise ignored.
fn project(doc: &mut Value, fields: &[String]) {
    if fields.is_empty() {
        return;
    }
    if let Some(obj) = doc.as_object_mut() {
        obj.retain(|key, _| key == "id" || fields.iter().any(|field| field == key));
    }
}
