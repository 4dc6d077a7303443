use crate::error::PermissionDenied;
use mercy_core::Permission;
use std::collections::BTreeSet;

/// Set of tags a caller must hold, all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement(BTreeSet<Permission>);

impl Requirement {
    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self(permissions.into_iter().collect())
    }

    pub fn single(permission: Permission) -> Self {
        Self::all([permission])
    }

    pub fn permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// `true` iff every required tag is in `held`.
    pub fn is_met_by(&self, held: &[Permission]) -> bool {
        self.0.iter().all(|p| held.contains(p))
    }

    pub fn check(&self, held: &[Permission]) -> Result<(), PermissionDenied> {
        let missing: Vec<Permission> = self
            .0
            .iter()
            .filter(|p| !held.contains(p))
            .copied()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PermissionDenied { missing })
        }
    }
}

impl From<Permission> for Requirement {
    fn from(permission: Permission) -> Self {
        Self::single(permission)
    }
}
