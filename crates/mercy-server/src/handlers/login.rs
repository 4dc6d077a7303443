//! Login and token validation.

use crate::context::Caller;
use crate::error::ApiError;
use crate::payload::Payload;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use mercy_core::{ErrorCode, ObjectId, Permission, Staff, Student};
use mercy_runtime::payload::identifier;
use mercy_runtime::{records, verify_password};
use mercy_store::{DocumentStore, Filter};
use serde::Serialize;

/// What a client learns about an authenticated staff member.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub student_id: String,
    pub name: String,
    pub permissions: Vec<Permission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
}

impl StaffProfile {
    async fn load(store: &dyn DocumentStore, staff: Staff) -> Result<Self, ApiError> {
        let student = records::find::<Student>(store, &Filter::by_id(&staff.student)).await?;
        Ok(Self {
            id: staff.id,
            name: student.map(|s| s.name).unwrap_or_default(),
            student_id: staff.student_id,
            permissions: staff.permissions,
            jwt: None,
        })
    }
}

/// `POST /op/login` with `{studentId, password}`.
pub async fn login(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<Json<StaffProfile>, ApiError> {
    let unknown = if state.auth().unify_credential_errors {
        ErrorCode::WrongCredentials
    } else {
        ErrorCode::StaffNotFound
    };

    let Some(student_id) = identifier(&body, "studentId") else {
        return Err(ApiError::unauthorized(unknown));
    };
    let staff = records::find::<Staff>(state.store(), &Filter::eq("studentId", student_id.as_str()))
        .await?
        .filter(|staff| staff.active)
        .ok_or_else(|| {
            tracing::debug!(%student_id, "Login for unknown or inactive staff");
            ApiError::unauthorized(unknown)
        })?;

    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or_default();
    if !verify_password(password, &staff.password) {
        tracing::debug!(%student_id, "Login with wrong password");
        return Err(ApiError::unauthorized(ErrorCode::WrongCredentials));
    }

    let jwt = state
        .tokens()
        .issue(&staff.student_id)
        .map_err(|e| ApiError::Internal(e.into()))?;
    tracing::info!(%student_id, "Staff logged in");

    let mut profile = StaffProfile::load(state.store(), staff).await?;
    profile.jwt = Some(jwt);
    Ok(Json(profile))
}

/// `POST /op/validate`: the token is still good; echo the caller's profile.
pub async fn validate(
    State(state): State<AppState>,
    Caller(staff): Caller,
) -> Result<Json<StaffProfile>, ApiError> {
    Ok(Json(StaffProfile::load(state.store(), staff).await?))
}
