//! The authentication gate.

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use mercy_core::{ErrorCode, Staff};
use mercy_runtime::records;
use mercy_store::Filter;
use mercy_token::TokenError;

/// Exempt from the gate.
pub const LOGIN_PATH: &str = "/op/login";

/// Establish the calling staff member for every protected request.
///
/// Every failure is a 401, including a valid token whose subject no longer
/// names a staff account.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.uri().path() == LOGIN_PATH {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers())?;
    let claims = state.tokens().verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        match e {
            TokenError::Expired { .. } => ApiError::unauthorized(ErrorCode::ExpiredToken),
            _ => ApiError::unauthorized(ErrorCode::InvalidToken),
        }
    })?;

    let staff = records::find::<Staff>(state.store(), &Filter::eq("studentId", claims.subject.as_str()))
        .await?
        .ok_or_else(|| {
            tracing::debug!(subject = %claims.subject, "Token subject has no staff account");
            ApiError::unauthorized(ErrorCode::StaffNotFound)
        })?;

    if state.auth().reject_inactive_staff && !staff.active {
        tracing::debug!(subject = %claims.subject, "Token subject is deactivated");
        return Err(ApiError::unauthorized(ErrorCode::StaffNotFound));
    }

    req.extensions_mut().insert(RequestContext::authenticated(staff));
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized(ErrorCode::MissingAuthHeader))?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized(ErrorCode::InvalidToken))
}
