//! Access enforcement
//!
//! Turns an effective level into an allow/deny decision for an action.
//! Denials carry the attempted action and a human-readable message; mapping
//! them to a response is up to the caller.

use super::{effective_level_for_agent, Agent};
use crate::errors::{Result, RightsError};
use crate::rights::{PermissionLevel, RightsRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Discover,
    Read,
    Edit,
}

impl Action {
    /// Minimum level that permits this action
    pub fn required_level(&self) -> PermissionLevel {
        match self {
            Action::Discover => PermissionLevel::Discover,
            Action::Read => PermissionLevel::Read,
            Action::Edit => PermissionLevel::Edit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Discover => "discover",
            Action::Read => "read",
            Action::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "discover" => Ok(Action::Discover),
            "read" | "show" => Ok(Action::Read),
            "edit" | "update" => Ok(Action::Edit),
            other => Err(RightsError::ValidationError(format!("Unknown action: {}", other))),
        }
    }
}

/// Check that `agent` may perform `action` on `record` at `now`
///
/// Returns the agent's effective level on success, or
/// [`RightsError::AccessDenied`] when that level is too low.
pub fn authorize(record: &RightsRecord, agent: &Agent, action: Action, now: DateTime<Utc>) -> Result<PermissionLevel> {
    let level = effective_level_for_agent(record, agent, now);

    if level.satisfies(action.required_level()) {
        debug!(action = %action, level = %level, "access granted");
        return Ok(level);
    }

    warn!(
        action = %action,
        level = %level,
        user = agent.user.as_deref().unwrap_or("anonymous"),
        "access denied"
    );
    Err(RightsError::AccessDenied {
        action,
        message: format!("You do not have sufficient privileges to {} this document.", action),
    })
}
