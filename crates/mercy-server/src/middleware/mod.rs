//! Request pipeline stages.

pub mod auth;
pub mod permission;
pub mod resolve;

pub use auth::{LOGIN_PATH, authenticate};
pub use permission::require_permission;
pub use resolve::resolve;
