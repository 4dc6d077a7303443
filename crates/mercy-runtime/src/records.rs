//! Typed access to stored documents.

use crate::entity::Entity;
use mercy_core::ObjectId;
use mercy_store::{Document, DocumentStore, Filter, StoreError};
use serde::Serialize;
use serde_json::Value;

pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotADocument),
    }
}

pub fn from_document<E: Entity>(doc: Document) -> Result<E, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

pub async fn find<E: Entity>(
    store: &dyn DocumentStore,
    filter: &Filter,
) -> Result<Option<E>, StoreError> {
    store
        .find_one(E::COLLECTION, filter)
        .await?
        .map(from_document)
        .transpose()
}

/// Every `E` matching `filter`, in insertion order.
pub async fn find_all<E: Entity>(
    store: &dyn DocumentStore,
    filter: &Filter,
    skip: u64,
    limit: Option<u64>,
) -> Result<Vec<E>, StoreError> {
    store
        .find_many(E::COLLECTION, filter, skip, limit)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

pub async fn insert<E: Entity>(store: &dyn DocumentStore, record: &E) -> Result<ObjectId, StoreError> {
    store.insert_one(E::COLLECTION, to_document(record)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mercy_core::Student;
    use mercy_store::MemoryStore;

    #[tokio::test]
    async fn test_insert_then_find_typed() {
        let store = MemoryStore::new();
        let mut student = Student::new("S1");
        student.name = "Ann".into();
        let id = insert(&store, &student).await.unwrap();
        assert_eq!(id, student.id);

        let found: Student = find(&store, &Filter::eq("studentId", "S1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, student);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_store_error() {
        let store = MemoryStore::new();
        let doc = serde_json::json!({"studentId": 5}).as_object().cloned().unwrap();
        store.insert_one(Student::COLLECTION, doc).await.unwrap();

        let err = find::<Student>(&store, &Filter::eq("studentId", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
