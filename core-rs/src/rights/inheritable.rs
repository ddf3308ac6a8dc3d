//! Inheritable rights
//!
//! An [`InheritableRightsRecord`] carries the rules a parent object hands down
//! to its children. It behaves like a [`RightsRecord`] except that indexing
//! writes only the `inheritable_*` field names.

use super::record::RightsRecord;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InheritableRightsRecord {
    record: RightsRecord,
}

impl InheritableRightsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the child-facing rules from a parent's record
    ///
    /// Copies every permission entry and the embargo release date. License,
    /// lease, visibility labels and histories stay with the parent.
    pub fn project(parent: &RightsRecord) -> Self {
        let mut record = RightsRecord::new();
        for (principal, level) in parent.permissions() {
            record.set_permission(principal.clone(), level);
        }
        record.set_embargo_release_at(parent.embargo_release_date());

        debug!(entries = record.permissions.len(), "projected inheritable rights");
        InheritableRightsRecord { record }
    }

    pub fn as_record(&self) -> &RightsRecord {
        &self.record
    }

    pub fn into_record(self) -> RightsRecord {
        self.record
    }
}

impl Deref for InheritableRightsRecord {
    type Target = RightsRecord;

    fn deref(&self) -> &RightsRecord {
        &self.record
    }
}

impl DerefMut for InheritableRightsRecord {
    fn deref_mut(&mut self) -> &mut RightsRecord {
        &mut self.record
    }
}

impl From<RightsRecord> for InheritableRightsRecord {
    fn from(record: RightsRecord) -> Self {
        InheritableRightsRecord { record }
    }
}

/// Shorthand for [`InheritableRightsRecord::project`]
pub fn project(parent: &RightsRecord) -> InheritableRightsRecord {
    InheritableRightsRecord::project(parent)
}
