//! Permission evaluator
//!
//! Computes the effective level a principal (or an agent with group
//! memberships) holds on a record at a given instant. Stored levels apply
//! unless an embargo or lease visibility override is in effect.
//!
//! Override resolution:
//! - embargo: `visibility_during_embargo` while under embargo, otherwise
//!   `visibility_after_embargo` once the release date has passed
//! - lease: `visibility_during_lease` while the lease is in force, otherwise
//!   `visibility_after_lease` once it expired
//! - embargo wins when both produce an override
//!
//! An override never removes `edit` from a principal that holds it. Stored
//! `read` and `discover` grants are suspended while an override is in
//! effect: every non-edit principal gets only what the override label
//! grants, so a `restricted` or `private` override leaves them with `none`.

pub mod enforcement;

pub use enforcement::{authorize, Action};

use crate::rights::{PermissionLevel, Principal, RightsRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Group every agent belongs to, signed in or not
pub const PUBLIC_GROUP: &str = "public";

/// Group every signed-in agent belongs to
pub const REGISTERED_GROUP: &str = "registered";

/// Interpreted visibility label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Open,
    Authenticated,
    Restricted,
    Private,
    Other(String),
}

impl Visibility {
    pub fn from_label(label: &str) -> Self {
        match label {
            "open" => Visibility::Open,
            "authenticated" => Visibility::Authenticated,
            "restricted" => Visibility::Restricted,
            "private" => Visibility::Private,
            other => Visibility::Other(other.to_string()),
        }
    }

    /// Level this visibility grants to a principal without `edit`
    pub fn granted_level(&self, principal: &Principal) -> PermissionLevel {
        match self {
            Visibility::Open => PermissionLevel::Read,
            Visibility::Authenticated => match principal {
                Principal::Group(id) if id == PUBLIC_GROUP => PermissionLevel::None,
                _ => PermissionLevel::Read,
            },
            Visibility::Restricted | Visibility::Private | Visibility::Other(_) => PermissionLevel::None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Open => f.write_str("open"),
            Visibility::Authenticated => f.write_str("authenticated"),
            Visibility::Restricted => f.write_str("restricted"),
            Visibility::Private => f.write_str("private"),
            Visibility::Other(label) => f.write_str(label),
        }
    }
}

/// Where an override visibility came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
    DuringEmbargo,
    AfterEmbargo,
    DuringLease,
    AfterLease,
}

/// A user acting on a record together with their group memberships
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// User key; `None` for an anonymous visitor
    pub user: Option<String>,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Agent {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(id: impl Into<String>) -> Self {
        Agent {
            user: Some(id.into()),
            groups: BTreeSet::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Every principal the agent acts as, including the implicit groups
    pub fn principals(&self) -> Vec<Principal> {
        let mut groups = self.groups.clone();
        groups.insert(PUBLIC_GROUP.to_string());
        if self.is_signed_in() {
            groups.insert(REGISTERED_GROUP.to_string());
        }

        let mut principals: Vec<Principal> = groups.into_iter().map(Principal::Group).collect();
        if let Some(user) = &self.user {
            principals.push(Principal::individual(user.clone()));
        }
        principals
    }
}

/// The visibility override in effect at `now`, if any
pub fn active_override(record: &RightsRecord, now: DateTime<Utc>) -> Option<(OverrideSource, Visibility)> {
    embargo_override(record, now).or_else(|| lease_override(record, now))
}

fn embargo_override(record: &RightsRecord, now: DateTime<Utc>) -> Option<(OverrideSource, Visibility)> {
    record.embargo_release_date()?;
    if record.is_under_embargo(now) {
        record
            .visibility_during_embargo()
            .map(|label| (OverrideSource::DuringEmbargo, Visibility::from_label(label)))
    } else {
        record
            .visibility_after_embargo()
            .map(|label| (OverrideSource::AfterEmbargo, Visibility::from_label(label)))
    }
}

fn lease_override(record: &RightsRecord, now: DateTime<Utc>) -> Option<(OverrideSource, Visibility)> {
    record.lease_expiration_date()?;
    if record.is_active_lease(now) {
        record
            .visibility_during_lease()
            .map(|label| (OverrideSource::DuringLease, Visibility::from_label(label)))
    } else {
        record
            .visibility_after_lease()
            .map(|label| (OverrideSource::AfterLease, Visibility::from_label(label)))
    }
}

/// Effective level of one principal at `now`
pub fn effective_level(record: &RightsRecord, principal: &Principal, now: DateTime<Utc>) -> PermissionLevel {
    let stored = record.permission(principal);
    if stored == PermissionLevel::Edit {
        return stored;
    }

    match active_override(record, now) {
        Some((_, visibility)) => visibility.granted_level(principal),
        None => stored,
    }
}

/// Highest effective level across the agent's user and groups
pub fn effective_level_for_agent(record: &RightsRecord, agent: &Agent, now: DateTime<Utc>) -> PermissionLevel {
    agent
        .principals()
        .iter()
        .map(|principal| effective_level(record, principal, now))
        .max()
        .unwrap_or_default()
}
