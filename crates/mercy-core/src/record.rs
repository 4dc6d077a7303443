//! Records kept in the document store.
//!
//! Field names on the wire follow the stored document layout: camelCase,
//! with `_id` for the internal identifier and `student_id` for the staff
//! back-reference to its student record.

use crate::id::ObjectId;
use crate::permission::Permission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person eligible to transact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// External identifier, unique across students.
    pub student_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub college: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Poverty-assistance tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poor_lv: Option<u32>,

    /// Point balance.
    #[serde(default)]
    pub point: i64,

    #[serde(default)]
    pub version: u64,

    pub creation_time: DateTime<Utc>,
}

impl Student {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            student_id: student_id.into(),
            name: String::new(),
            college: String::new(),
            phone: None,
            poor_lv: None,
            point: 0,
            version: 0,
            creation_time: Utc::now(),
        }
    }
}

/// A principal capable of authenticating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Login handle; equals the linked student's external identifier.
    pub student_id: String,

    /// Internal identifier of the linked student record.
    #[serde(rename = "student_id")]
    pub student: ObjectId,

    /// Argon2 PHC string.
    pub password: String,

    #[serde(default)]
    pub permissions: Vec<Permission>,

    #[serde(default)]
    pub version: u64,

    #[serde(default = "default_active")]
    pub active: bool,

    pub creation_time: DateTime<Utc>,
}

impl Staff {
    pub fn new(student: &Student, password_hash: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            student_id: student.student_id.clone(),
            student: student.id,
            password: password_hash.into(),
            permissions: Vec::new(),
            version: 0,
            active: true,
            creation_time: Utc::now(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// A catalog entry. Removal means `active = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub rent: Option<f64>,

    #[serde(default)]
    pub poor_price_factor: f64,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub version: u64,

    pub creation_time: DateTime<Utc>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            description: String::new(),
            price: None,
            rent: None,
            poor_price_factor: 0.0,
            active: true,
            version: 0,
            creation_time: Utc::now(),
        }
    }
}

// Documents written before the active flag existed count as active.
fn default_active() -> bool {
    true
}
