//! Permission gate for mutation routes.

use crate::context::RequestContext;
use crate::error::ApiError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use mercy_core::ErrorCode;
use mercy_policy::Requirement;

/// Forward only if the caller holds every tag in `requirement`.
///
/// Runs after the authentication gate and never touches the store.
pub async fn require_permission(
    State(requirement): State<Requirement>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.staff_self.as_ref())
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("permission check before authentication")))?;

    if let Err(denied) = requirement.check(&caller.permissions) {
        tracing::debug!(
            staff = %caller.student_id,
            missing = ?denied.missing,
            path = %req.uri().path(),
            "Permission denied"
        );
        return Err(ApiError::new(ErrorCode::NoPermission));
    }

    Ok(next.run(req).await)
}
