//! # mercy-server
//!
//! HTTP surface of the Mercy registry.
//!
//! Every request under `/op/` except `/op/login` passes through the
//! authentication gate, then (for mutations) a permission check, then (for
//! record-specific routes) the resolver, before reaching its handler:
//!
//! ```text
//! authenticate ─▶ require_permission ─▶ resolve::<E> ─▶ handler
//! ```
//!
//! Each stage fills a slot of the typed [`RequestContext`](context::RequestContext)
//! carried in the request extensions.

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payload;
pub mod routes;
pub mod startup;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
