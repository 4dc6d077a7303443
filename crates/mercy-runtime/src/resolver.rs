//! Lookup by alternate key.
//!
//! A request names a record either by its external identifier (the unique
//! `studentId` of students and staff) or by its internal `_id`. Both may
//! arrive in the JSON body or the query string; the body wins per key, and
//! an external identifier from either source wins over an internal one.

use crate::entity::Entity;
use crate::error::ResolveError;
use crate::payload::identifier;
use crate::records;
use mercy_core::ObjectId;
use mercy_store::{Document, DocumentStore, Filter, ID_FIELD};
use std::collections::HashMap;

/// Query-string alias for the internal identifier.
pub const ID_QUERY_PARAM: &str = "id";

/// Identifiers extracted from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupKeys {
    pub external: Option<String>,
    pub internal: Option<String>,
}

impl LookupKeys {
    pub fn from_sources(
        external_key: Option<&str>,
        body: Option<&Document>,
        query: &HashMap<String, String>,
    ) -> Self {
        let from_query = |name: &str| query.get(name).filter(|v| !v.is_empty()).cloned();

        let external = external_key.and_then(|key| {
            body.and_then(|b| identifier(b, key))
                .or_else(|| from_query(key))
        });
        let internal = body
            .and_then(|b| identifier(b, ID_FIELD))
            .or_else(|| from_query(ID_QUERY_PARAM))
            .or_else(|| from_query(ID_FIELD));

        Self { external, internal }
    }
}

/// Fetch the record `keys` identify.
pub async fn resolve<E: Entity>(
    store: &dyn DocumentStore,
    keys: &LookupKeys,
) -> Result<E, ResolveError> {
    let filter = match (E::EXTERNAL_KEY, &keys.external, &keys.internal) {
        (Some(field), Some(value), _) => Filter::eq(field, value.as_str()),
        (_, _, Some(raw)) => {
            let id: ObjectId = raw
                .parse()
                .map_err(|_| ResolveError::MalformedIdentifier(raw.clone()))?;
            Filter::by_id(&id)
        }
        _ => return Err(ResolveError::MissingIdentifier),
    };

    match records::find::<E>(store, &filter).await? {
        Some(found) => Ok(found),
        None => {
            tracing::debug!(kind = %E::KIND, ?keys, "No record matched lookup");
            Err(ResolveError::NotFound)
        }
    }
}
