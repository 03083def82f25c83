//! Shared success-envelope builders for API handlers.
//!
//! All successful JSON responses use the `{ "status": "success", ... }`
//! envelope: collection reads add a top-level `results` count and nest the
//! documents under `data.data`; single-document reads nest under `data.data`;
//! authentication endpoints add a top-level `token` and nest the account
//! under `data.user`. Use these builders instead of ad-hoc `json!` blocks so
//! the shapes stay consistent across handlers.

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// `{ "status": "success", "results": N, "data": { "data": [...] } }`
///
/// Takes already-serialized documents so list handlers can apply field
/// projection before wrapping.
pub fn collection(docs: Vec<Value>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "results": docs.len(),
        "data": { "data": docs },
    }))
}

/// `{ "status": "success", "data": { "data": ... } }`
pub fn document<T: Serialize>(doc: T) -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": { "data": doc },
    }))
}

/// `{ "status": "success", "data": { "user": ... } }`
pub fn user_document<T: Serialize>(user: T) -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": { "user": user },
    }))
}

/// `{ "status": "success", "token": ..., "data": { "user": ... } }`
pub fn authenticated<T: Serialize>(token: &str, user: T) -> Json<Value> {
    Json(json!({
        "status": "success",
        "token": token,
        "data": { "user": user },
    }))
}

/// `{ "status": "success", "message": ... }`
pub fn message(text: &str) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": text,
    }))
}

/// `{ "status": "success" }` -- acknowledgements with nothing to report.
pub fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_counts_results() {
        let body = collection(vec![json!({"id": 1}), json!({"id": 2})]).0;
        assert_eq!(body["status"], "success");
        assert_eq!(body["results"], 2);
        assert_eq!(body["data"]["data"][1]["id"], 2);
    }

    #[test]
    fn document_nests_under_data_data() {
        let body = document(json!({"id": 7})).0;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["data"]["id"], 7);
        assert!(body.get("results").is_none());
    }

    #[test]
    fn authenticated_carries_token_and_user() {
        let body = authenticated("abc.def.ghi", json!({"id": 1})).0;
        assert_eq!(body["token"], "abc.def.ghi");
        assert_eq!(body["data"]["user"]["id"], 1);
    }
}
