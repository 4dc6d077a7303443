//! Permission failures.

use mercy_core::Permission;
use thiserror::Error;

/// A requirement was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing permissions: {missing:?}")]
pub struct PermissionDenied {
    /// Required tags absent from the holder's set, in tag order.
    pub missing: Vec<Permission>,
}
