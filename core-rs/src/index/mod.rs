//! Index flattener
//!
//! Converts a rights record into flat search-index fields. Field names come
//! from an explicit [`IndexConfig`]: normal records use `config.fields`,
//! inheritable records use `config.inheritable` and emit nothing else.
//!
//! # Example
//!
//! ```rust
//! use hydra_rights::{IndexConfig, Indexable, IndexValue, PermissionLevel, Principal, RightsRecord};
//!
//! let mut record = RightsRecord::new();
//! record.set_permission(Principal::group("public"), PermissionLevel::Read);
//!
//! let doc = record.to_index_fields(&IndexConfig::default());
//! assert_eq!(doc["read_access_group_ssim"], IndexValue::list(["public"]));
//! ```

pub mod config;

pub use config::{AccessFields, FieldNames, IndexConfig, INHERITABLE_PREFIX};

use crate::rights::{format_instant, InheritableRightsRecord, PermissionLevel, PrincipalKind, RightsRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Value of one index field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexValue {
    Scalar(String),
    List(Vec<String>),
}

impl IndexValue {
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            IndexValue::Scalar(value) => Some(value),
            IndexValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            IndexValue::List(values) => Some(values),
            IndexValue::Scalar(_) => None,
        }
    }
}

/// Field name to value, ordered by field name
pub type IndexDocument = BTreeMap<String, IndexValue>;

/// Anything that can be flattened into index fields
pub trait Indexable {
    fn to_index_fields(&self, config: &IndexConfig) -> IndexDocument;
}

impl Indexable for RightsRecord {
    fn to_index_fields(&self, config: &IndexConfig) -> IndexDocument {
        flatten(self, &config.fields)
    }
}

impl Indexable for InheritableRightsRecord {
    fn to_index_fields(&self, config: &IndexConfig) -> IndexDocument {
        flatten(self.as_record(), &config.inheritable)
    }
}

/// Flatten a record using one field-name table
///
/// Level/kind pairs without principals, unset dates and unset labels are
/// left out rather than written empty.
pub fn flatten(record: &RightsRecord, names: &FieldNames) -> IndexDocument {
    let mut doc = IndexDocument::new();

    for level in PermissionLevel::GRANTING {
        let Some(fields) = names.access(level) else {
            continue;
        };
        for kind in [PrincipalKind::Group, PrincipalKind::Individual] {
            let ids = record.principals_with(kind, level);
            if !ids.is_empty() {
                doc.insert(fields.for_kind(kind).to_string(), IndexValue::List(ids));
            }
        }
    }

    let dates = [
        (&names.embargo_release_date, record.embargo_release_date()),
        (&names.lease_expiration_date, record.lease_expiration_date()),
    ];
    for (field, date) in dates {
        if let Some(date) = date {
            doc.insert(field.clone(), IndexValue::Scalar(format_instant(&date)));
        }
    }

    let labels = [
        (&names.visibility_during_embargo, record.visibility_during_embargo()),
        (&names.visibility_after_embargo, record.visibility_after_embargo()),
        (&names.visibility_during_lease, record.visibility_during_lease()),
        (&names.visibility_after_lease, record.visibility_after_lease()),
    ];
    for (field, label) in labels {
        if let Some(label) = label {
            doc.insert(field.clone(), IndexValue::list([label]));
        }
    }

    debug!(fields = doc.len(), "flattened rights record");
    doc
}
