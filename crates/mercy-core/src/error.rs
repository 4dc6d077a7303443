//! Client-facing error codes.
//!
//! Every request-scoped failure is reported to the client as
//! `{"error": "<ErrorCode>"}`. The codes are stable and machine-readable;
//! the HTTP status usually follows from the code, but a few codes are
//! surfaced with a different status depending on the stage that raised
//! them (e.g. `StaffNotFound` is 401 at the authentication gate and 404
//! from the resolver).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // =========================================================================
    // Authentication
    // =========================================================================
    MissingAuthHeader,
    InvalidToken,
    ExpiredToken,
    WrongCredentials,

    // =========================================================================
    // Authorization
    // =========================================================================
    NoPermission,

    // =========================================================================
    // Per-entity resolution and validation
    // =========================================================================
    StaffNotFound,
    StaffInvalidQuery,
    StaffInvalidInfo,
    StaffAlreadyExists,

    StudentNotFound,
    StudentInvalidQuery,
    StudentInvalidInfo,
    StudentAlreadyExists,

    ItemNotFound,
    ItemInvalidQuery,
    ItemInvalidInfo,
    ItemAlreadyExists,

    // =========================================================================
    // Updates and transport
    // =========================================================================
    VersionConflict,
    MalformedBody,
    RequestTimeout,
    Internal,
}

impl ErrorCode {
    /// The HTTP status normally paired with this code.
    pub fn default_status(&self) -> u16 {
        match self {
            Self::MissingAuthHeader
            | Self::InvalidToken
            | Self::ExpiredToken
            | Self::WrongCredentials => 401,
            Self::NoPermission => 403,
            Self::StaffNotFound | Self::StudentNotFound | Self::ItemNotFound => 404,
            Self::StaffInvalidQuery
            | Self::StaffInvalidInfo
            | Self::StaffAlreadyExists
            | Self::StudentInvalidQuery
            | Self::StudentInvalidInfo
            | Self::StudentAlreadyExists
            | Self::ItemInvalidQuery
            | Self::ItemInvalidInfo
            | Self::ItemAlreadyExists
            | Self::MalformedBody => 400,
            Self::RequestTimeout => 408,
            Self::VersionConflict => 409,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The three record kinds the registry manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Staff,
    Item,
}

impl EntityKind {
    pub fn not_found(&self) -> ErrorCode {
        match self {
            Self::Student => ErrorCode::StudentNotFound,
            Self::Staff => ErrorCode::StaffNotFound,
            Self::Item => ErrorCode::ItemNotFound,
        }
    }

    pub fn invalid_query(&self) -> ErrorCode {
        match self {
            Self::Student => ErrorCode::StudentInvalidQuery,
            Self::Staff => ErrorCode::StaffInvalidQuery,
            Self::Item => ErrorCode::ItemInvalidQuery,
        }
    }

    pub fn invalid_info(&self) -> ErrorCode {
        match self {
            Self::Student => ErrorCode::StudentInvalidInfo,
            Self::Staff => ErrorCode::StaffInvalidInfo,
            Self::Item => ErrorCode::ItemInvalidInfo,
        }
    }

    pub fn already_exists(&self) -> ErrorCode {
        match self {
            Self::Student => ErrorCode::StudentAlreadyExists,
            Self::Staff => ErrorCode::StaffAlreadyExists,
            Self::Item => ErrorCode::ItemAlreadyExists,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_serialize_by_name() {
        let json = serde_json::to_value(ErrorCode::ItemNotFound).unwrap();
        assert_eq!(json, serde_json::json!("ItemNotFound"));
        assert_eq!(ErrorCode::NoPermission.to_string(), "NoPermission");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ExpiredToken.default_status(), 401);
        assert_eq!(ErrorCode::NoPermission.default_status(), 403);
        assert_eq!(ErrorCode::StudentInvalidQuery.default_status(), 400);
        assert_eq!(ErrorCode::ItemNotFound.default_status(), 404);
        assert_eq!(ErrorCode::VersionConflict.default_status(), 409);
        assert_eq!(ErrorCode::RequestTimeout.default_status(), 408);
    }

    #[test]
    fn test_entity_specific_codes() {
        assert_eq!(EntityKind::Staff.not_found(), ErrorCode::StaffNotFound);
        assert_eq!(EntityKind::Item.invalid_query(), ErrorCode::ItemInvalidQuery);
        assert_eq!(EntityKind::Student.already_exists(), ErrorCode::StudentAlreadyExists);
    }
}
