//! Versioned partial updates.

use crate::diff::Diff;
use crate::entity::Entity;
use crate::error::UpdateError;
use crate::payload::{EXPECTED_VERSION_FIELD, supplied};
use crate::records;
use mercy_core::{ObjectId, Student};
use mercy_store::{Document, DocumentStore, Filter, Update, VERSION_FIELD};
use serde::Serialize;
use serde_json::Value;

/// What an update did: the record's id plus every field actually written,
/// including the new version when a write happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub applied: Document,
}

impl UpdateOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// The optional `expectedVersion` precondition.
pub fn expected_version(payload: &Document) -> Result<Option<u64>, UpdateError> {
    supplied(payload, EXPECTED_VERSION_FIELD)
        .map(|raw| {
            raw.as_u64().ok_or_else(|| UpdateError::InvalidField {
                field: EXPECTED_VERSION_FIELD.to_string(),
            })
        })
        .transpose()
}

/// Apply the changes `payload` makes to `current`.
///
/// Without `expectedVersion` two writers that read the same version both
/// succeed; each bumps the stored counter once and overlapping fields end
/// with the last write. With it, a mismatch against either the resolved
/// record or the record at write time fails with
/// [`UpdateError::VersionConflict`].
pub async fn apply_update<E: Entity>(
    store: &dyn DocumentStore,
    current: &E,
    payload: &Document,
) -> Result<UpdateOutcome, UpdateError> {
    let id = current.id();
    let expected = expected_version(payload)?;
    if let Some(expected) = expected
        && expected != current.version()
    {
        return Err(UpdateError::VersionConflict {
            expected,
            found: Some(current.version()),
        });
    }

    let mut diff = Diff::new();
    current.stage(payload, &mut diff)?;
    if diff.is_empty() {
        tracing::debug!(collection = %E::COLLECTION, %id, "Update changes nothing");
        return Ok(UpdateOutcome {
            id,
            applied: Document::new(),
        });
    }

    ensure_unique_key(store, current, &diff).await?;
    relink_student::<E>(store, &mut diff).await?;

    let mut filter = Filter::by_id(&id);
    if let Some(expected) = expected {
        filter = filter.and(VERSION_FIELD, expected);
    }

    let changed: Vec<String> = diff.field_names().into_iter().map(String::from).collect();
    let mut applied = diff.into_fields();
    let result = store
        .update_one(E::COLLECTION, &filter, Update::set(applied.clone()).bump_version())
        .await?;

    if !result.matched {
        return Err(match expected {
            Some(expected) => UpdateError::VersionConflict {
                expected,
                found: None,
            },
            None => UpdateError::NotFound,
        });
    }

    tracing::info!(
        collection = %E::COLLECTION,
        %id,
        fields = ?changed,
        version = ?result.version,
        "Applied update"
    );

    if let Some(version) = result.version {
        applied.insert(VERSION_FIELD.to_string(), Value::from(version));
    }
    for field in E::REDACTED {
        applied.remove(*field);
    }
    Ok(UpdateOutcome { id, applied })
}

async fn ensure_unique_key<E: Entity>(
    store: &dyn DocumentStore,
    current: &E,
    diff: &Diff,
) -> Result<(), UpdateError> {
    let Some(field) = E::EXTERNAL_KEY else {
        return Ok(());
    };
    let Some(value) = diff.get(field) else {
        return Ok(());
    };

    let holder = records::find::<E>(store, &Filter::eq(field, value.clone())).await?;
    match holder {
        Some(other) if other.id() != current.id() => Err(UpdateError::Duplicate {
            field: field.to_string(),
            value: value.as_str().unwrap_or_default().to_string(),
        }),
        _ => Ok(()),
    }
}

async fn relink_student<E: Entity>(store: &dyn DocumentStore, diff: &mut Diff) -> Result<(), UpdateError> {
    let (Some(key), Some(link)) = (E::EXTERNAL_KEY, E::STUDENT_LINK) else {
        return Ok(());
    };
    let Some(value) = diff.get(key).cloned() else {
        return Ok(());
    };

    let student = records::find::<Student>(store, &Filter::eq("studentId", value.clone()))
        .await?
        .ok_or_else(|| UpdateError::StudentNotFound(value.as_str().unwrap_or_default().to_string()))?;
    diff.set(link, student.id.to_hex());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{find, insert};
    use mercy_core::{Item, Staff, Student};
    use mercy_store::MemoryStore;
    use serde_json::json;

    fn payload(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn reload<E: Entity>(store: &MemoryStore, id: &ObjectId) -> E {
        find::<E>(store, &Filter::by_id(id)).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_diff_is_minimal() {
        let store = MemoryStore::new();
        let mut item = Item::new("A");
        item.price = Some(10.0);
        item.version = 4;
        insert(&store, &item).await.unwrap();

        let outcome = apply_update(&store, &item, &payload(json!({"name": "A", "price": 20})))
            .await
            .unwrap();
        assert_eq!(outcome.id, item.id);
        assert_eq!(outcome.applied, payload(json!({"price": 20, "version": 5})));

        let stored: Item = reload(&store, &item.id).await;
        assert_eq!(stored.price, Some(20.0));
        assert_eq!(stored.version, 5);
    }

    #[tokio::test]
    async fn test_repeated_update_is_noop() {
        let store = MemoryStore::new();
        let student = Student::new("S1");
        insert(&store, &student).await.unwrap();
        let p = payload(json!({"name": "Ann", "college": "Arts"}));

        let first = apply_update(&store, &student, &p).await.unwrap();
        assert!(!first.is_noop());

        let updated: Student = reload(&store, &student.id).await;
        let second = apply_update(&store, &updated, &p).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(serde_json::to_value(&second).unwrap(), json!({"_id": student.id.to_hex()}));

        let after: Student = reload(&store, &student.id).await;
        assert_eq!(after.version, updated.version);
    }

    #[tokio::test]
    async fn test_concurrent_stale_writers_both_land() {
        let store = MemoryStore::new();
        let mut student = Student::new("S1");
        student.version = 3;
        insert(&store, &student).await.unwrap();

        // Both writers hold the same version-3 snapshot
        let a = payload(json!({"name": "Ann"}));
        let b = payload(json!({"college": "Arts"}));
        let (ra, rb) = tokio::join!(
            apply_update(&store, &student, &a),
            apply_update(&store, &student, &b)
        );
        ra.unwrap();
        rb.unwrap();

        let stored: Student = reload(&store, &student.id).await;
        assert_eq!(stored.version, 5);
        assert_eq!(stored.name, "Ann");
        assert_eq!(stored.college, "Arts");
    }

    #[tokio::test]
    async fn test_expected_version_mismatch_conflicts() {
        let store = MemoryStore::new();
        let mut student = Student::new("S1");
        student.version = 3;
        insert(&store, &student).await.unwrap();

        let err = apply_update(&store, &student, &payload(json!({"name": "Ann", "expectedVersion": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::VersionConflict { expected: 2, .. }));

        let stored: Student = reload(&store, &student.id).await;
        assert_eq!(stored.version, 3);
    }

    #[tokio::test]
    async fn test_expected_version_detects_intervening_write() {
        let store = MemoryStore::new();
        let student = Student::new("S1");
        insert(&store, &student).await.unwrap();

        apply_update(&store, &student, &payload(json!({"name": "Ann"})))
            .await
            .unwrap();

        // Stale snapshot still says version 0
        let err = apply_update(
            &store,
            &student,
            &payload(json!({"college": "Arts", "expectedVersion": 0})),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, UpdateError::VersionConflict { found: None, .. }));
    }

    #[tokio::test]
    async fn test_expected_version_must_be_unsigned() {
        let store = MemoryStore::new();
        let student = Student::new("S1");
        let err = apply_update(&store, &student, &payload(json!({"expectedVersion": "3"})))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::InvalidField { .. }));
    }

    #[tokio::test]
    async fn test_external_key_change_must_stay_unique() {
        let store = MemoryStore::new();
        let first = Student::new("S1");
        let second = Student::new("S2");
        insert(&store, &first).await.unwrap();
        insert(&store, &second).await.unwrap();

        let err = apply_update(&store, &second, &payload(json!({"studentId": "S1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::Duplicate { .. }));

        let ok = apply_update(&store, &second, &payload(json!({"studentId": "S3"})))
            .await
            .unwrap();
        assert_eq!(ok.applied["studentId"], json!("S3"));
    }

    #[tokio::test]
    async fn test_staff_password_not_echoed() {
        let store = MemoryStore::new();
        let student = Student::new("S1");
        let staff = Staff::new(&student, crate::password::hash_password("old").unwrap());
        insert(&store, &staff).await.unwrap();

        let outcome = apply_update(&store, &staff, &payload(json!({"password": "new"})))
            .await
            .unwrap();
        assert!(!outcome.applied.contains_key("password"));
        assert_eq!(outcome.applied["version"], json!(1));

        let stored: Staff = reload(&store, &staff.id).await;
        assert!(crate::password::verify_password("new", &stored.password));
    }

    #[tokio::test]
    async fn test_staff_rename_follows_student() {
        let store = MemoryStore::new();
        let first = Student::new("S1");
        let second = Student::new("S2");
        insert(&store, &first).await.unwrap();
        insert(&store, &second).await.unwrap();
        let staff = Staff::new(&first, crate::password::hash_password("p").unwrap());
        insert(&store, &staff).await.unwrap();

        let err = apply_update(&store, &staff, &payload(json!({"studentId": "S9"})))
            .await
            .unwrap_err();
        assert!(matches!(&err, UpdateError::StudentNotFound(id) if id == "S9"));
        assert_eq!(
            err.code(mercy_core::EntityKind::Staff),
            Some(mercy_core::ErrorCode::StudentNotFound)
        );
        let unchanged: Staff = reload(&store, &staff.id).await;
        assert_eq!(unchanged.student_id, "S1");
        assert_eq!(unchanged.version, 0);

        let outcome = apply_update(&store, &staff, &payload(json!({"studentId": "S2"})))
            .await
            .unwrap();
        assert_eq!(outcome.applied["student_id"], json!(second.id.to_hex()));

        let moved: Staff = reload(&store, &staff.id).await;
        assert_eq!(moved.student_id, "S2");
        assert_eq!(moved.student, second.id);
    }

    #[tokio::test]
    async fn test_student_rename_does_not_relink() {
        let store = MemoryStore::new();
        let student = Student::new("S1");
        insert(&store, &student).await.unwrap();

        let outcome = apply_update(&store, &student, &payload(json!({"studentId": "S7"})))
            .await
            .unwrap();
        assert_eq!(outcome.applied, payload(json!({"studentId": "S7", "version": 1})));
    }

    #[tokio::test]
    async fn test_vanished_record_is_not_found() {
        let store = MemoryStore::new();
        let item = Item::new("ghost");
        let err = apply_update(&store, &item, &payload(json!({"name": "real"})))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::NotFound));
    }
}
