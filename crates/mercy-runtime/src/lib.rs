//! # mercy-runtime
//!
//! The record pipeline between the HTTP layer and the document store:
//!
//! - [`resolver`] turns loosely-typed client identifiers into a stored
//!   record, or a typed not-found / invalid-query failure.
//! - [`update`] computes the minimal diff between a partial payload and
//!   the stored record and writes it with an atomic version increment.
//! - [`create`] validates and inserts new records.
//! - [`listing`] pages, searches and filters whole collections.
//!
//! All three are written once against the [`Entity`] trait and specialize
//! over [`Student`](mercy_core::Student), [`Staff`](mercy_core::Staff) and
//! [`Item`](mercy_core::Item).

pub mod create;
pub mod diff;
pub mod entity;
pub mod error;
pub mod listing;
pub mod password;
pub mod payload;
pub mod records;
pub mod resolver;
pub mod update;

pub use create::{create_item, create_staff, create_student};
pub use diff::Diff;
pub use entity::Entity;
pub use error::{CreateError, ResolveError, UpdateError};
pub use listing::{Page, active_items, list_students, search_students};
pub use password::{PasswordError, hash_password, verify_password};
pub use resolver::{LookupKeys, resolve};
pub use update::{UpdateOutcome, apply_update};
