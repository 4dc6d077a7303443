//! Resolver stage: attach the target record to the request context.

use crate::context::{ContextSlot, RequestContext};
use crate::error::ApiError;
use crate::handlers::query_params;
use crate::payload::{BODY_LIMIT, parse_object};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use mercy_core::ErrorCode;
use mercy_runtime::LookupKeys;

/// Resolve an `E` from the body and query string.
///
/// The body is buffered and handed on unchanged, so the handler can still
/// read it.
pub async fn resolve<E: ContextSlot>(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|_| ApiError::new(ErrorCode::MalformedBody))?;
    let doc = parse_object(&bytes)?;
    let query = query_params(&parts.uri);

    let keys = LookupKeys::from_sources(E::EXTERNAL_KEY, doc.as_ref(), &query);
    let found = mercy_runtime::resolve::<E>(state.store(), &keys)
        .await
        .map_err(|e| ApiError::resolve(E::KIND, e))?;

    let mut ctx = parts.extensions.remove::<RequestContext>().unwrap_or_default();
    *E::slot_mut(&mut ctx) = Some(found);
    parts.extensions.insert(ctx);

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
