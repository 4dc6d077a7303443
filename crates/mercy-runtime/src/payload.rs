//! Reading fields out of client payloads.

use mercy_store::Document;
use serde_json::Value;

/// Payload field naming the version the client last observed.
pub const EXPECTED_VERSION_FIELD: &str = "expectedVersion";

/// `null` and `""` count as "not supplied"; `0`, `false` and `[]` do not.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// The value of `field` if present and non-empty.
pub fn supplied<'a>(payload: &'a Document, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|value| !is_empty(value))
}

/// Read an identifier-like field as a string. Numbers are accepted and
/// rendered in decimal; any other non-empty type yields `None`.
pub fn identifier(payload: &Document, field: &str) -> Option<String> {
    match supplied(payload, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
