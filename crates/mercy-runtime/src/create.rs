//! Record creation.
//!
//! New records start at version 0; staff and items start active. The
//! external identifier is checked for uniqueness before the insert.

use crate::entity::Entity;
use crate::error::CreateError;
use crate::password::hash_password;
use crate::payload::supplied;
use crate::records;
use mercy_core::{Item, Permission, Staff, Student};
use mercy_store::{Document, DocumentStore, Filter};
use serde::de::DeserializeOwned;

pub async fn create_student(
    store: &dyn DocumentStore,
    payload: &Document,
) -> Result<Student, CreateError> {
    let student_id: String = required(payload, "studentId")?;
    ensure_vacant::<Student>(store, &student_id).await?;

    let mut student = Student::new(student_id);
    student.name = optional(payload, "name")?.unwrap_or_default();
    student.college = optional(payload, "college")?.unwrap_or_default();
    student.phone = optional(payload, "phone")?;
    student.poor_lv = optional(payload, "poorLv")?;

    records::insert(store, &student).await?;
    tracing::info!(id = %student.id, student_id = %student.student_id, "Created student");
    Ok(student)
}

/// Create a staff account for an existing student.
pub async fn create_staff(
    store: &dyn DocumentStore,
    payload: &Document,
) -> Result<Staff, CreateError> {
    let student_id: String = required(payload, "studentId")?;
    ensure_vacant::<Staff>(store, &student_id).await?;

    let student = records::find::<Student>(store, &Filter::eq("studentId", student_id.as_str()))
        .await?
        .ok_or_else(|| CreateError::StudentNotFound(student_id.clone()))?;

    let password: String = required(payload, "password")?;
    let mut staff = Staff::new(&student, hash_password(&password)?);
    staff.permissions = optional::<Vec<Permission>>(payload, "permissions")?.unwrap_or_default();

    records::insert(store, &staff).await?;
    tracing::info!(
        id = %staff.id,
        student_id = %staff.student_id,
        permissions = ?staff.permissions,
        "Created staff"
    );
    Ok(staff)
}

pub async fn create_item(
    store: &dyn DocumentStore,
    payload: &Document,
) -> Result<Item, CreateError> {
    let mut item = Item::new(required::<String>(payload, "name")?);
    item.description = optional(payload, "description")?.unwrap_or_default();
    item.price = optional(payload, "price")?;
    item.rent = optional(payload, "rent")?;
    item.poor_price_factor = optional(payload, "poorPriceFactor")?.unwrap_or(0.0);

    records::insert(store, &item).await?;
    tracing::info!(id = %item.id, name = %item.name, "Created item");
    Ok(item)
}

fn optional<T: DeserializeOwned>(payload: &Document, field: &str) -> Result<Option<T>, CreateError> {
    supplied(payload, field)
        .map(|raw| {
            serde_json::from_value(raw.clone()).map_err(|_| CreateError::InvalidField {
                field: field.to_string(),
            })
        })
        .transpose()
}

fn required<T: DeserializeOwned>(payload: &Document, field: &str) -> Result<T, CreateError> {
    optional(payload, field)?.ok_or_else(|| CreateError::MissingField {
        field: field.to_string(),
    })
}

async fn ensure_vacant<E: Entity>(store: &dyn DocumentStore, key: &str) -> Result<(), CreateError> {
    let Some(field) = E::EXTERNAL_KEY else {
        return Ok(());
    };
    match records::find::<E>(store, &Filter::eq(field, key)).await? {
        Some(_) => Err(CreateError::AlreadyExists),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use mercy_store::MemoryStore;
    use serde_json::{Value, json};

    fn payload(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_student_requires_id() {
        let store = MemoryStore::new();
        let err = create_student(&store, &payload(json!({"name": "Ann"})))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::MissingField { field } if field == "studentId"));
    }

    #[tokio::test]
    async fn test_create_student_rejects_duplicate() {
        let store = MemoryStore::new();
        let p = payload(json!({"studentId": "S1", "name": "Ann", "college": "Arts"}));
        let student = create_student(&store, &p).await.unwrap();
        assert_eq!(student.version, 0);
        assert_eq!(student.college, "Arts");

        let err = create_student(&store, &p).await.unwrap_err();
        assert!(matches!(err, CreateError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_create_staff_links_student() {
        let store = MemoryStore::new();
        let student = create_student(&store, &payload(json!({"studentId": "S1"})))
            .await
            .unwrap();

        let staff = create_staff(
            &store,
            &payload(json!({"studentId": "S1", "password": "p", "permissions": ["alterItems"]})),
        )
        .await
        .unwrap();
        assert_eq!(staff.student, student.id);
        assert!(staff.active);
        assert_eq!(staff.permissions, vec![Permission::AlterItems]);
        assert!(verify_password("p", &staff.password));
    }

    #[tokio::test]
    async fn test_create_staff_needs_student_and_password() {
        let store = MemoryStore::new();
        let err = create_staff(&store, &payload(json!({"studentId": "S9", "password": "p"})))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::StudentNotFound(id) if id == "S9"));

        create_student(&store, &payload(json!({"studentId": "S1"})))
            .await
            .unwrap();
        let err = create_staff(&store, &payload(json!({"studentId": "S1", "password": ""})))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::MissingField { field } if field == "password"));
    }

    #[tokio::test]
    async fn test_create_item_defaults() {
        let store = MemoryStore::new();
        let item = create_item(&store, &payload(json!({"name": "pen", "price": 3})))
            .await
            .unwrap();
        assert!(item.active);
        assert_eq!(item.price, Some(3.0));
        assert_eq!(item.rent, None);
        assert_eq!(item.poor_price_factor, 0.0);

        let err = create_item(&store, &payload(json!({"description": "no name"})))
            .await
            .unwrap_err();
        assert!(matches!(err, CreateError::MissingField { .. }));
    }
}
