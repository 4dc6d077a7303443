use crate::context::Resolved;
use crate::error::ApiError;
use crate::payload::Payload;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use mercy_core::{EntityKind, ObjectId, Permission, Staff};
use mercy_runtime::{UpdateOutcome, apply_update, create_staff};
use serde::Serialize;

/// A staff record without its password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub student_id: String,
    #[serde(rename = "student_id")]
    pub student: ObjectId,
    pub permissions: Vec<Permission>,
    pub creation_time: DateTime<Utc>,
    pub version: u64,
    pub active: bool,
}

impl From<Staff> for StaffView {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id,
            student_id: staff.student_id,
            student: staff.student,
            permissions: staff.permissions,
            creation_time: staff.creation_time,
            version: staff.version,
            active: staff.active,
        }
    }
}

pub async fn add(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<Json<StaffView>, ApiError> {
    let staff = create_staff(state.store(), &body)
        .await
        .map_err(|e| ApiError::create(EntityKind::Staff, e))?;
    Ok(Json(staff.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Resolved(staff): Resolved<Staff>,
    Payload(body): Payload,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = apply_update(state.store(), &staff, &body)
        .await
        .map_err(|e| ApiError::update(EntityKind::Staff, e))?;
    Ok(Json(outcome))
}

pub async fn show(Resolved(staff): Resolved<Staff>) -> Json<StaffView> {
    Json(staff.into())
}
