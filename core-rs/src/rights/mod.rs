//! Rights metadata module
//!
//! Provides the rights record of a repository object: per-principal
//! permission levels, license, embargo and lease windows, audit histories,
//! and the inheritable projection handed to child objects.

pub mod clock;
pub mod inheritable;
pub mod principal;
pub mod record;

pub use clock::{format_instant, parse_instant};
pub use inheritable::{project, InheritableRightsRecord};
pub use principal::{PermissionLevel, Principal, PrincipalKind};
pub use record::{BulkPermissions, License, RightsRecord};
