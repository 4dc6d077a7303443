//! Typed per-request context.
//!
//! The gate stores the authenticated staff member in `staff_self`; the
//! resolver stores the target record in the slot for its kind. Handlers
//! read them back through the [`Caller`] and [`Resolved`] extractors.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mercy_core::{Item, Staff, Student};
use mercy_runtime::Entity;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub staff_self: Option<Staff>,
    pub student: Option<Student>,
    pub staff: Option<Staff>,
    pub item: Option<Item>,
}

impl RequestContext {
    pub fn authenticated(staff: Staff) -> Self {
        Self {
            staff_self: Some(staff),
            ..Self::default()
        }
    }
}

/// An entity kind with a resolver slot in [`RequestContext`].
pub trait ContextSlot: Entity + Clone {
    fn slot(ctx: &RequestContext) -> Option<&Self>;
    fn slot_mut(ctx: &mut RequestContext) -> &mut Option<Self>;
}

impl ContextSlot for Student {
    fn slot(ctx: &RequestContext) -> Option<&Self> {
        ctx.student.as_ref()
    }
    fn slot_mut(ctx: &mut RequestContext) -> &mut Option<Self> {
        &mut ctx.student
    }
}

impl ContextSlot for Staff {
    fn slot(ctx: &RequestContext) -> Option<&Self> {
        ctx.staff.as_ref()
    }
    fn slot_mut(ctx: &mut RequestContext) -> &mut Option<Self> {
        &mut ctx.staff
    }
}

impl ContextSlot for Item {
    fn slot(ctx: &RequestContext) -> Option<&Self> {
        ctx.item.as_ref()
    }
    fn slot_mut(ctx: &mut RequestContext) -> &mut Option<Self> {
        &mut ctx.item
    }
}

/// The authenticated staff member.
pub struct Caller(pub Staff);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.staff_self.clone())
            .map(Caller)
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("route is not behind the auth gate")))
    }
}

/// The record the resolver attached for this route.
pub struct Resolved<E>(pub E);

impl<E: ContextSlot, S: Send + Sync> FromRequestParts<S> for Resolved<E> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(E::slot)
            .cloned()
            .map(Resolved)
            .ok_or_else(|| {
                ApiError::Internal(anyhow::anyhow!("no resolved {} on this route", E::KIND))
            })
    }
}
