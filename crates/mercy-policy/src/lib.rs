//! Permission evaluation.
//!
//! A [`Requirement`] is always a set of [`Permission`] tags; a single tag is
//! just a singleton set. A staff member satisfies a requirement iff every
//! required tag appears in their permission list, in any order, duplicates
//! allowed. Evaluation is pure and never touches the store.

pub mod error;
pub mod requirement;

pub use error::PermissionDenied;
pub use mercy_core::Permission;
pub use requirement::Requirement;
