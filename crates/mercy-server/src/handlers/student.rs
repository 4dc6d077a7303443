use crate::context::Resolved;
use crate::error::ApiError;
use crate::handlers::query_params;
use crate::payload::Payload;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::Uri;
use mercy_core::{EntityKind, ErrorCode, Student};
use mercy_runtime::{Page, UpdateOutcome, apply_update, create_student, list_students, search_students};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub async fn add(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<Json<Student>, ApiError> {
    let student = create_student(state.store(), &body)
        .await
        .map_err(|e| ApiError::create(EntityKind::Student, e))?;
    Ok(Json(student))
}

pub async fn update(
    State(state): State<AppState>,
    Resolved(student): Resolved<Student>,
    Payload(body): Payload,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let outcome = apply_update(state.store(), &student, &body)
        .await
        .map_err(|e| ApiError::update(EntityKind::Student, e))?;
    Ok(Json(outcome))
}

pub async fn show(Resolved(student): Resolved<Student>) -> Json<Student> {
    Json(student)
}

#[derive(Debug, Deserialize)]
pub struct PublicQuery {
    pub name: Option<String>,
}

/// The part of a student record the student may see without logging in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStudent {
    pub student_id: String,
    pub name: String,
    pub point: i64,
    pub college: String,
}

/// `GET /student?studentId=..&name=..`
pub async fn public(
    Resolved(student): Resolved<Student>,
    Query(query): Query<PublicQuery>,
) -> Result<Json<PublicStudent>, ApiError> {
    if let Some(name) = query.name.filter(|n| !n.is_empty())
        && name != student.name
    {
        return Err(ApiError::new(ErrorCode::StudentNotFound));
    }
    Ok(Json(PublicStudent {
        student_id: student.student_id,
        name: student.name,
        point: student.point,
        college: student.college,
    }))
}

/// `GET /op/students`, paged when both `page` and `limit` are at least 1.
pub async fn list(State(state): State<AppState>, uri: Uri) -> Result<Json<Vec<Student>>, ApiError> {
    let query = query_params(&uri);
    let page = match (number(&query, "page")?, number(&query, "limit")?) {
        (Some(page), Some(limit)) => Page::new(page, limit),
        _ => None,
    };
    Ok(Json(list_students(state.store(), page).await?))
}

/// `GET /op/students/query?prompt=..`
pub async fn search(State(state): State<AppState>, uri: Uri) -> Result<Json<Vec<Student>>, ApiError> {
    let query = query_params(&uri);
    let prompt = query.get("prompt").map(String::as_str).unwrap_or_default();
    Ok(Json(search_students(state.store(), prompt).await?))
}

fn number(query: &HashMap<String, String>, name: &str) -> Result<Option<u64>, ApiError> {
    query
        .get(name)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::new(ErrorCode::StudentInvalidQuery))
        })
        .transpose()
}
