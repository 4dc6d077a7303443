//! Process-local document store.

use crate::adapter::{
    Collection, Document, DocumentStore, Filter, ID_FIELD, Update, UpdateResult, assign_id,
};
use crate::error::StoreError;
use async_trait::async_trait;
use mercy_core::ObjectId;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store. Each operation holds the lock for its whole duration, so
/// single-document updates are atomic just like the SQLite backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::LockError)?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::LockError)?;
        let Some(docs) = collections.get(&collection) else {
            return Ok(Vec::new());
        };
        let take = limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(take)
            .cloned()
            .collect())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut doc: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = assign_id(&mut doc)?;
        let mut collections = self.collections.write().map_err(|_| StoreError::LockError)?;
        let docs = collections.entry(collection).or_default();

        let taken = docs
            .iter()
            .any(|existing| existing.get(ID_FIELD) == doc.get(ID_FIELD));
        if taken {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id: id.to_hex(),
            });
        }

        docs.push(doc);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        update: Update,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::LockError)?;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)));

        Ok(match target {
            Some(doc) => UpdateResult {
                matched: true,
                version: update.apply_to(doc),
            },
            None => UpdateResult::unmatched(),
        })
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::LockError)?;
        Ok(collections.get(&collection).map_or(0, |docs| docs.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_find_many_pages_in_insertion_order() {
        let store = MemoryStore::new();
        for (name, active) in [("a", true), ("b", false), ("c", true), ("d", true)] {
            store
                .insert_one(Collection::Items, doc(json!({"name": name, "active": active})))
                .await
                .unwrap();
        }

        let active = Filter::eq("active", true);
        let all = store.find_many(Collection::Items, &active, 0, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec![json!("a"), json!("c"), json!("d")]);

        let page = store
            .find_many(Collection::Items, &Filter::default(), 1, Some(2))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["name"], json!("b"));

        let empty = store
            .find_many(Collection::Students, &Filter::default(), 0, None)
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Students, doc(json!({"studentId": "S1"})))
            .await
            .unwrap();

        let by_key = store
            .find_one(Collection::Students, &Filter::eq("studentId", "S1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_key[ID_FIELD], json!(id.to_hex()));

        let by_id = store
            .find_one(Collection::Students, &Filter::by_id(&id))
            .await
            .unwrap();
        assert!(by_id.is_some());

        // Collections are independent
        let other = store
            .find_one(Collection::Staffs, &Filter::by_id(&id))
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        let d = doc(json!({"_id": id.to_hex()}));
        store.insert_one(Collection::Items, d.clone()).await.unwrap();
        let err = store.insert_one(Collection::Items, d).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_update_with_version_filter() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Items, doc(json!({"name": "pen", "version": 0})))
            .await
            .unwrap();

        let fields = doc(json!({"name": "pencil"}));
        let stale = Filter::by_id(&id).and("version", 7);
        let result = store
            .update_one(Collection::Items, &stale, Update::set(fields.clone()).bump_version())
            .await
            .unwrap();
        assert!(!result.matched);

        let current = Filter::by_id(&id).and("version", 0);
        let result = store
            .update_one(Collection::Items, &current, Update::set(fields).bump_version())
            .await
            .unwrap();
        assert_eq!(result, UpdateResult { matched: true, version: Some(1) });

        let stored = store
            .find_one(Collection::Items, &Filter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["name"], json!("pencil"));
        assert_eq!(stored["version"], json!(1));
    }

    #[tokio::test]
    async fn test_count() {
        let store = MemoryStore::new();
        assert_eq!(store.count(Collection::Staffs).await.unwrap(), 0);
        store.insert_one(Collection::Staffs, Document::new()).await.unwrap();
        assert_eq!(store.count(Collection::Staffs).await.unwrap(), 1);
    }
}
