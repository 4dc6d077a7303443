//! Staff capability tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability gating one class of mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    /// Create and update staff accounts.
    AlterStaffs,
    /// Create, update and deactivate catalog items.
    AlterItems,
    /// Create and update student records.
    AlterStudents,
    /// Edit a student's contact and assistance details.
    AlterStudentInfo,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::AlterStaffs,
        Permission::AlterItems,
        Permission::AlterStudents,
        Permission::AlterStudentInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlterStaffs => "alterStaffs",
            Self::AlterItems => "alterItems",
            Self::AlterStudents => "alterStudents",
            Self::AlterStudentInfo => "alterStudentInfo",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_display() {
        for permission in Permission::ALL {
            let json = serde_json::to_value(permission).unwrap();
            assert_eq!(json, serde_json::json!(permission.as_str()));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!(serde_json::from_str::<Permission>("\"rootAccess\"").is_err());
    }
}
