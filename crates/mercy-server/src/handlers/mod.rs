//! Route handlers.

pub mod item;
pub mod login;
pub mod staff;
pub mod student;

use axum::Json;
use axum::extract::Query;
use axum::http::Uri;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Query-string parameters; an unparsable query string reads as empty.
pub fn query_params(uri: &Uri) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(q)| q)
        .unwrap_or_default()
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "mercy-server" }))
}
