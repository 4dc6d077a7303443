//! The per-kind parameters shared by resolution, creation and updates.

use crate::diff::Diff;
use crate::error::UpdateError;
use crate::password::{hash_password, verify_password};
use crate::payload::supplied;
use mercy_core::{EntityKind, Item, ObjectId, Permission, Staff, Student};
use mercy_store::{Collection, Document};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;

pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;
    const COLLECTION: Collection;

    /// Unique external identifier field, for kinds that have one.
    const EXTERNAL_KEY: Option<&'static str>;

    /// Fields never echoed back to clients.
    const REDACTED: &'static [&'static str] = &[];

    /// Field holding the `_id` of the student named by `EXTERNAL_KEY`.
    /// When the external key changes, the link follows it.
    const STUDENT_LINK: Option<&'static str> = None;

    fn id(&self) -> ObjectId;

    fn version(&self) -> u64;

    /// Stage every mutable field the payload changes.
    fn stage(&self, payload: &Document, diff: &mut Diff) -> Result<(), UpdateError>;
}

impl Entity for Student {
    const KIND: EntityKind = EntityKind::Student;
    const COLLECTION: Collection = Collection::Students;
    const EXTERNAL_KEY: Option<&'static str> = Some("studentId");

    fn id(&self) -> ObjectId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn stage(&self, payload: &Document, diff: &mut Diff) -> Result<(), UpdateError> {
        diff.stage(payload, "studentId", &self.student_id)?;
        diff.stage(payload, "name", &self.name)?;
        diff.stage(payload, "college", &self.college)?;
        diff.stage(payload, "phone", &self.phone)?;
        diff.stage(payload, "poorLv", &self.poor_lv)?;
        Ok(())
    }
}

impl Entity for Staff {
    const KIND: EntityKind = EntityKind::Staff;
    const COLLECTION: Collection = Collection::Staffs;
    const EXTERNAL_KEY: Option<&'static str> = Some("studentId");
    const REDACTED: &'static [&'static str] = &["password"];
    const STUDENT_LINK: Option<&'static str> = Some("student_id");

    fn id(&self) -> ObjectId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn stage(&self, payload: &Document, diff: &mut Diff) -> Result<(), UpdateError> {
        diff.stage(payload, "studentId", &self.student_id)?;

        let held: BTreeSet<Permission> = self.permissions.iter().copied().collect();
        diff.stage_by(payload, "permissions", |new: &Vec<Permission>| {
            new.iter().copied().collect::<BTreeSet<_>>() != held
        })?;

        diff.stage(payload, "active", &self.active)?;

        // Only the hash is ever staged
        if let Some(raw) = supplied(payload, "password") {
            let plain = raw.as_str().ok_or_else(|| UpdateError::InvalidField {
                field: "password".to_string(),
            })?;
            if !verify_password(plain, &self.password) {
                diff.set("password", hash_password(plain)?);
            }
        }
        Ok(())
    }
}

impl Entity for Item {
    const KIND: EntityKind = EntityKind::Item;
    const COLLECTION: Collection = Collection::Items;
    const EXTERNAL_KEY: Option<&'static str> = None;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn stage(&self, payload: &Document, diff: &mut Diff) -> Result<(), UpdateError> {
        diff.stage(payload, "name", &self.name)?;
        diff.stage(payload, "description", &self.description)?;
        diff.stage(payload, "price", &self.price)?;
        diff.stage(payload, "rent", &self.rent)?;
        diff.stage(payload, "poorPriceFactor", &self.poor_price_factor)?;
        diff.stage(payload, "active", &self.active)?;
        Ok(())
    }
}
