use crate::error::StoreError;
use async_trait::async_trait;
use mercy_core::ObjectId;
use serde_json::{Map, Value};
use std::fmt;

/// A stored document: a flat JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Field holding a document's internal identifier.
pub const ID_FIELD: &str = "_id";

/// Field holding a document's version counter.
pub const VERSION_FIELD: &str = "version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Staffs,
    Items,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Staffs => "staffs",
            Self::Items => "items",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of field-equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn by_id(id: &ObjectId) -> Self {
        Self::eq(ID_FIELD, id.to_hex())
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            conditions: vec![(field.into(), value.into())],
        }
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

/// An atomic single-document modification: a field-set, optionally combined
/// with a `+1` on the stored version counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Document,
    bump_version: bool,
}

impl Update {
    pub fn set(fields: Document) -> Self {
        Self {
            set: fields,
            bump_version: false,
        }
    }

    /// Increment the stored version as part of the same write.
    pub fn bump_version(mut self) -> Self {
        self.bump_version = true;
        self
    }

    pub fn fields(&self) -> &Document {
        &self.set
    }

    pub fn bumps_version(&self) -> bool {
        self.bump_version
    }

    /// Apply to an in-memory document. Returns the resulting version.
    pub(crate) fn apply_to(&self, doc: &mut Document) -> Option<u64> {
        for (field, value) in &self.set {
            doc.insert(field.clone(), value.clone());
        }
        if self.bump_version {
            let next = doc.get(VERSION_FIELD).and_then(Value::as_u64).unwrap_or(0) + 1;
            doc.insert(VERSION_FIELD.to_string(), Value::from(next));
        }
        doc.get(VERSION_FIELD).and_then(Value::as_u64)
    }
}

/// Outcome of [`DocumentStore::update_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Whether a document matched the filter (and was therefore written).
    pub matched: bool,
    /// Version stored after the write, when a document matched.
    pub version: Option<u64>,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self {
            matched: false,
            version: None,
        }
    }
}

/// Document store accessor injected into every pipeline component.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document in `collection` matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Documents matching `filter` in insertion order, skipping the first
    /// `skip` and returning at most `limit` (all when `None`).
    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document, assigning an `_id` when it carries none.
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> Result<ObjectId, StoreError>;

    /// Apply `update` atomically to the first document matching `filter`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: Update,
    ) -> Result<UpdateResult, StoreError>;

    /// Number of documents in `collection`.
    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;
}

/// Ensure `doc` carries a valid `_id`, generating one if absent.
pub(crate) fn assign_id(doc: &mut Document) -> Result<ObjectId, StoreError> {
    match doc.get(ID_FIELD) {
        Some(Value::String(raw)) => raw
            .parse()
            .map_err(|e: mercy_core::ObjectIdError| StoreError::InvalidId(e.to_string())),
        Some(other) => Err(StoreError::InvalidId(other.to_string())),
        None => {
            let id = ObjectId::new();
            doc.insert(ID_FIELD.to_string(), Value::from(id.to_hex()));
            Ok(id)
        }
    }
}
