//! Pipeline failures.
//!
//! Each error knows the client-facing [`ErrorCode`] it maps to for a given
//! entity kind. `None` means the failure is internal and must not be shown
//! to the client beyond `Internal`.

use crate::password::PasswordError;
use mercy_core::{EntityKind, ErrorCode};
use mercy_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither an external nor an internal identifier was supplied.
    #[error("no identifier supplied")]
    MissingIdentifier,

    #[error("malformed identifier '{0}'")]
    MalformedIdentifier(String),

    #[error("no matching record")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResolveError {
    pub fn code(&self, kind: EntityKind) -> Option<ErrorCode> {
        match self {
            Self::MissingIdentifier | Self::MalformedIdentifier(_) => Some(kind.invalid_query()),
            Self::NotFound => Some(kind.not_found()),
            Self::Store(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    /// A supplied value does not decode into the field's type.
    #[error("invalid value for field '{field}'")]
    InvalidField { field: String },

    #[error("version conflict: expected {expected}, stored {found:?}")]
    VersionConflict { expected: u64, found: Option<u64> },

    /// The new external identifier is already held by another record.
    #[error("'{value}' is already used as {field}")]
    Duplicate { field: String, value: String },

    /// The record vanished between resolution and write.
    #[error("record no longer exists")]
    NotFound,

    /// A new external identifier names no student to link to.
    #[error("no student with id '{0}'")]
    StudentNotFound(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UpdateError {
    pub fn code(&self, kind: EntityKind) -> Option<ErrorCode> {
        match self {
            Self::InvalidField { .. } => Some(kind.invalid_info()),
            Self::VersionConflict { .. } => Some(ErrorCode::VersionConflict),
            Self::Duplicate { .. } => Some(kind.already_exists()),
            Self::NotFound => Some(kind.not_found()),
            Self::StudentNotFound(_) => Some(ErrorCode::StudentNotFound),
            Self::Password(_) | Self::Store(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("invalid value for field '{field}'")]
    InvalidField { field: String },

    #[error("a record with this identifier already exists")]
    AlreadyExists,

    /// A staff account must link to an existing student.
    #[error("no student with id '{0}'")]
    StudentNotFound(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CreateError {
    pub fn code(&self, kind: EntityKind) -> Option<ErrorCode> {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } => Some(kind.invalid_info()),
            Self::AlreadyExists => Some(kind.already_exists()),
            Self::StudentNotFound(_) => Some(ErrorCode::StudentNotFound),
            Self::Password(_) | Self::Store(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_entity_kind() {
        assert_eq!(
            ResolveError::MissingIdentifier.code(EntityKind::Item),
            Some(ErrorCode::ItemInvalidQuery)
        );
        assert_eq!(
            ResolveError::NotFound.code(EntityKind::Staff),
            Some(ErrorCode::StaffNotFound)
        );
        assert_eq!(
            UpdateError::Duplicate {
                field: "studentId".into(),
                value: "S1".into()
            }
            .code(EntityKind::Student),
            Some(ErrorCode::StudentAlreadyExists)
        );
        assert_eq!(
            CreateError::StudentNotFound("S9".into()).code(EntityKind::Staff),
            Some(ErrorCode::StudentNotFound)
        );
    }

    #[test]
    fn test_store_failures_are_internal() {
        let err = ResolveError::Store(StoreError::LockError);
        assert_eq!(err.code(EntityKind::Student), None);
    }
}
