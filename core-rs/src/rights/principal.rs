//! Principals and permission levels
//!
//! A principal is either a group or an individual, identified by (kind, id).
//! Permission levels form a total order: `none < discover < read < edit`.

use crate::errors::{Result, RightsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of principal a permission entry applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Group,
    #[serde(rename = "person", alias = "individual")]
    Individual,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Group => "group",
            PrincipalKind::Individual => "person",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = RightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "group" => Ok(PrincipalKind::Group),
            "person" | "individual" | "user" => Ok(PrincipalKind::Individual),
            other => Err(RightsError::InvalidPrincipalKind(other.to_string())),
        }
    }
}

/// A group or an individual user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Principal {
    Group(String),
    Individual(String),
}

impl Principal {
    pub fn group(id: impl Into<String>) -> Self {
        Principal::Group(id.into())
    }

    pub fn individual(id: impl Into<String>) -> Self {
        Principal::Individual(id.into())
    }

    /// Build a principal from a kind string (`group`, `person`, `individual`)
    pub fn from_kind(kind: &str, id: impl Into<String>) -> Result<Self> {
        Ok(Self::with_kind(kind.parse()?, id))
    }

    pub fn with_kind(kind: PrincipalKind, id: impl Into<String>) -> Self {
        match kind {
            PrincipalKind::Group => Principal::Group(id.into()),
            PrincipalKind::Individual => Principal::Individual(id.into()),
        }
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Group(_) => PrincipalKind::Group,
            Principal::Individual(_) => PrincipalKind::Individual,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::Group(id) | Principal::Individual(id) => id,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Access level granted to a principal
///
/// Higher levels imply every lower one, so comparisons use the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    None,
    Discover,
    Read,
    Edit,
}

impl PermissionLevel {
    /// Levels that carry access, lowest first
    pub const GRANTING: [PermissionLevel; 3] =
        [PermissionLevel::Discover, PermissionLevel::Read, PermissionLevel::Edit];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::None => "none",
            PermissionLevel::Discover => "discover",
            PermissionLevel::Read => "read",
            PermissionLevel::Edit => "edit",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PermissionLevel::None)
    }

    /// True when this level includes everything `required` grants
    pub fn satisfies(&self, required: PermissionLevel) -> bool {
        *self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = RightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(PermissionLevel::None),
            "discover" => Ok(PermissionLevel::Discover),
            "read" => Ok(PermissionLevel::Read),
            "edit" => Ok(PermissionLevel::Edit),
            other => Err(RightsError::InvalidLevel(other.to_string())),
        }
    }
}
