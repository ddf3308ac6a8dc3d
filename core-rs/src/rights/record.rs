//! Rights record for a single repository object
//!
//! Holds the permission map (one level per principal), the license block,
//! embargo/lease dates with their visibility labels, and the audit histories.
//! Date handling and deactivation live in [`crate::rights::clock`].

use super::principal::{PermissionLevel, Principal, PrincipalKind};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// License statement attached to an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Permissions grouped by principal kind
///
/// This is the shape accepted by [`RightsRecord::update_permissions`] and the
/// shape permissions take when a record is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPermissions {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub group: BTreeMap<String, PermissionLevel>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", alias = "individual")]
    pub person: BTreeMap<String, PermissionLevel>,
}

impl BulkPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, id: impl Into<String>, level: PermissionLevel) -> Self {
        self.group.insert(id.into(), level);
        self
    }

    pub fn person(mut self, id: impl Into<String>, level: PermissionLevel) -> Self {
        self.person.insert(id.into(), level);
        self
    }

    /// Build from untyped input such as `{"group": {"librarians": "read"}}`
    ///
    /// Kinds and levels are validated; the first invalid entry fails the build.
    pub fn from_strings(input: &HashMap<String, HashMap<String, String>>) -> Result<Self> {
        let mut bulk = BulkPermissions::default();
        for (kind, entries) in input {
            let kind: PrincipalKind = kind.parse()?;
            for (id, level) in entries {
                let level: PermissionLevel = level.parse()?;
                match kind {
                    PrincipalKind::Group => bulk.group.insert(id.clone(), level),
                    PrincipalKind::Individual => bulk.person.insert(id.clone(), level),
                };
            }
        }
        Ok(bulk)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Principal, PermissionLevel)> + '_ {
        let groups = self.group.iter().map(|(id, level)| (Principal::group(id.clone()), *level));
        let people = self.person.iter().map(|(id, level)| (Principal::individual(id.clone()), *level));
        groups.chain(people)
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.person.is_empty()
    }
}

/// Access rules for one repository object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsRecord {
    #[serde(default, with = "permission_map")]
    pub(crate) permissions: BTreeMap<Principal, PermissionLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) embargo_release_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) visibility_during_embargo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) visibility_after_embargo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) embargo_history: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) lease_expiration_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) visibility_during_lease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) visibility_after_lease: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) lease_history: Vec<String>,
}

impl RightsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level for one principal, replacing any level it had
    ///
    /// `PermissionLevel::None` removes the entry. Returns the level applied.
    pub fn set_permission(&mut self, principal: Principal, level: PermissionLevel) -> PermissionLevel {
        debug!(principal = %principal, level = %level, "setting permission");
        self.permissions.remove(&principal);
        if !level.is_none() {
            self.permissions.insert(principal, level);
        }
        level
    }

    /// Current level for a principal, `none` when absent
    pub fn permission(&self, principal: &Principal) -> PermissionLevel {
        self.permissions.get(principal).copied().unwrap_or_default()
    }

    /// Apply [`set_permission`](Self::set_permission) to every entry of `bulk`
    pub fn update_permissions(&mut self, bulk: &BulkPermissions) {
        for (principal, level) in bulk.iter() {
            self.set_permission(principal, level);
        }
    }

    /// Remove every principal entry; dates, labels and license are kept
    pub fn clear_permissions(&mut self) {
        debug!(entries = self.permissions.len(), "clearing permissions");
        self.permissions.clear();
    }

    /// Group id to level
    pub fn groups(&self) -> BTreeMap<String, PermissionLevel> {
        self.entries_of(PrincipalKind::Group)
    }

    /// Individual id to level
    pub fn individuals(&self) -> BTreeMap<String, PermissionLevel> {
        self.entries_of(PrincipalKind::Individual)
    }

    /// All entries in principal order (groups first, then individuals)
    pub fn permissions(&self) -> impl Iterator<Item = (&Principal, PermissionLevel)> {
        self.permissions.iter().map(|(p, l)| (p, *l))
    }

    /// Ids of the given kind holding exactly `level`, sorted
    pub fn principals_with(&self, kind: PrincipalKind, level: PermissionLevel) -> Vec<String> {
        self.permissions
            .iter()
            .filter(|(p, l)| p.kind() == kind && **l == level)
            .map(|(p, _)| p.id().to_string())
            .collect()
    }

    fn entries_of(&self, kind: PrincipalKind) -> BTreeMap<String, PermissionLevel> {
        self.permissions
            .iter()
            .filter(|(p, _)| p.kind() == kind)
            .map(|(p, l)| (p.id().to_string(), *l))
            .collect()
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    pub fn set_license(&mut self, license: Option<License>) {
        self.license = license;
    }

    pub fn visibility_during_embargo(&self) -> Option<&str> {
        self.visibility_during_embargo.as_deref()
    }

    pub fn set_visibility_during_embargo(&mut self, label: Option<&str>) {
        self.visibility_during_embargo = label.map(str::to_string);
    }

    pub fn visibility_after_embargo(&self) -> Option<&str> {
        self.visibility_after_embargo.as_deref()
    }

    pub fn set_visibility_after_embargo(&mut self, label: Option<&str>) {
        self.visibility_after_embargo = label.map(str::to_string);
    }

    pub fn visibility_during_lease(&self) -> Option<&str> {
        self.visibility_during_lease.as_deref()
    }

    pub fn set_visibility_during_lease(&mut self, label: Option<&str>) {
        self.visibility_during_lease = label.map(str::to_string);
    }

    pub fn visibility_after_lease(&self) -> Option<&str> {
        self.visibility_after_lease.as_deref()
    }

    pub fn set_visibility_after_lease(&mut self, label: Option<&str>) {
        self.visibility_after_lease = label.map(str::to_string);
    }

    pub fn embargo_history(&self) -> &[String] {
        &self.embargo_history
    }

    pub fn lease_history(&self) -> &[String] {
        &self.lease_history
    }

    /// Append an audit line to the embargo history
    pub fn record_embargo_event(&mut self, entry: impl Into<String>) {
        self.embargo_history.push(entry.into());
    }

    /// Append an audit line to the lease history
    pub fn record_lease_event(&mut self, entry: impl Into<String>) {
        self.lease_history.push(entry.into());
    }
}

/// Serializes the principal map grouped by kind, matching [`BulkPermissions`]
mod permission_map {
    use super::{BulkPermissions, PermissionLevel, Principal};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(map: &BTreeMap<Principal, PermissionLevel>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bulk = BulkPermissions::default();
        for (principal, level) in map {
            match principal {
                Principal::Group(id) => bulk.group.insert(id.clone(), *level),
                Principal::Individual(id) => bulk.person.insert(id.clone(), *level),
            };
        }
        bulk.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<Principal, PermissionLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bulk = BulkPermissions::deserialize(deserializer)?;
        let map = bulk.iter().filter(|(_, level)| !level.is_none()).collect();
        Ok(map)
    }
}
