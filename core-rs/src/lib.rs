//! # Hydra Rights - rights metadata for repository objects
//!
//! Models the access rules attached to one object in a digital repository
//! and the projections consumers need from them.
//!
//! ## Key Features
//!
//! - Per-group and per-person permission levels (`discover` < `read` < `edit`)
//! - Embargo and lease windows with visibility overrides and audit history
//! - Effective-level evaluation at a caller-supplied instant
//! - Inheritable projection of a parent's rules for child objects
//! - Flattening to search-index fields from an explicit field-name table
//! - JSON/YAML persistence behind a codec trait
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        RightsRecord          │
//! │ permissions, license, dates  │
//! └──────────────────────────────┘
//!      │              │             │
//!      ▼              ▼             ▼
//! ┌──────────┐  ┌────────────┐  ┌─────────────┐
//! │evaluator │  │  project() │  │    index    │
//! │ (on use) │  │ (on save)  │  │ (on save)   │
//! └──────────┘  └────────────┘  └─────────────┘
//! ```

pub mod errors;
pub mod evaluator;
pub mod index;
pub mod rights;
pub mod storage;

pub use errors::RightsError;
pub use evaluator::{
    active_override, authorize, effective_level, effective_level_for_agent, Action, Agent, OverrideSource,
    Visibility,
};
pub use index::{flatten, FieldNames, IndexConfig, IndexDocument, IndexValue, Indexable};
pub use rights::{
    project, BulkPermissions, InheritableRightsRecord, License, PermissionLevel, Principal, PrincipalKind,
    RightsRecord,
};
pub use storage::{load_record, save_record, JsonCodec, RecordFormat, RightsCodec, YamlCodec};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
