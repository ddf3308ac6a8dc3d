/**
 * config.rs
 * Index field-name tables (YAML format)
 *
 * Format:
 * ```yaml
 * fields:
 *   discover: { group: discover_access_group_ssim, individual: discover_access_person_ssim }
 *   read: { group: read_access_group_ssim, individual: read_access_person_ssim }
 *   edit: { group: edit_access_group_ssim, individual: edit_access_person_ssim }
 *   embargoReleaseDate: embargo_release_date_dtsi
 * inheritable:
 *   embargoReleaseDate: inheritable_embargo_release_date_dtsi
 * ```
 *
 * Omitted keys fall back to the default table of their section, down to
 * single `group`/`individual` names; the inheritable section defaults to
 * the prefixed names.
 */

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value as YamlValue;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{Result, RightsError};
use crate::rights::{PermissionLevel, PrincipalKind};

/// Prefix applied to every inheritable field name
pub const INHERITABLE_PREFIX: &str = "inheritable_";

/// Field names for one permission level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessFields {
    pub group: String,
    pub individual: String,
}

impl AccessFields {
    fn for_level(level: &str) -> Self {
        AccessFields {
            group: format!("{}_access_group_ssim", level),
            individual: format!("{}_access_person_ssim", level),
        }
    }

    pub fn for_kind(&self, kind: PrincipalKind) -> &str {
        match kind {
            PrincipalKind::Group => &self.group,
            PrincipalKind::Individual => &self.individual,
        }
    }
}

/// One complete field-name table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldNames {
    pub discover: AccessFields,
    pub read: AccessFields,
    pub edit: AccessFields,
    pub embargo_release_date: String,
    pub lease_expiration_date: String,
    pub visibility_during_embargo: String,
    pub visibility_after_embargo: String,
    pub visibility_during_lease: String,
    pub visibility_after_lease: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        FieldNames {
            discover: AccessFields::for_level("discover"),
            read: AccessFields::for_level("read"),
            edit: AccessFields::for_level("edit"),
            embargo_release_date: "embargo_release_date_dtsi".to_string(),
            lease_expiration_date: "lease_expiration_date_dtsi".to_string(),
            visibility_during_embargo: "visibility_during_embargo_ssim".to_string(),
            visibility_after_embargo: "visibility_after_embargo_ssim".to_string(),
            visibility_during_lease: "visibility_during_lease_ssim".to_string(),
            visibility_after_lease: "visibility_after_lease_ssim".to_string(),
        }
    }
}

impl FieldNames {
    /// Default table with every name prefixed
    pub fn prefixed(prefix: &str) -> Self {
        let base = FieldNames::default();
        let p = |name: &str| format!("{}{}", prefix, name);
        let access = |fields: &AccessFields| AccessFields {
            group: p(&fields.group),
            individual: p(&fields.individual),
        };

        FieldNames {
            discover: access(&base.discover),
            read: access(&base.read),
            edit: access(&base.edit),
            embargo_release_date: p(&base.embargo_release_date),
            lease_expiration_date: p(&base.lease_expiration_date),
            visibility_during_embargo: p(&base.visibility_during_embargo),
            visibility_after_embargo: p(&base.visibility_after_embargo),
            visibility_during_lease: p(&base.visibility_during_lease),
            visibility_after_lease: p(&base.visibility_after_lease),
        }
    }

    /// Access fields for a granting level; `None` for `PermissionLevel::None`
    pub fn access(&self, level: PermissionLevel) -> Option<&AccessFields> {
        match level {
            PermissionLevel::None => None,
            PermissionLevel::Discover => Some(&self.discover),
            PermissionLevel::Read => Some(&self.read),
            PermissionLevel::Edit => Some(&self.edit),
        }
    }

    /// Every field name in the table
    pub fn all(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(12);
        for fields in [&self.discover, &self.read, &self.edit] {
            names.push(fields.group.as_str());
            names.push(fields.individual.as_str());
        }
        names.extend([
            self.embargo_release_date.as_str(),
            self.lease_expiration_date.as_str(),
            self.visibility_during_embargo.as_str(),
            self.visibility_after_embargo.as_str(),
            self.visibility_during_lease.as_str(),
            self.visibility_after_lease.as_str(),
        ]);
        names
    }
}

/// Normal and inheritable field tables used by the index flattener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    #[serde(deserialize_with = "fields_table")]
    pub fields: FieldNames,
    #[serde(deserialize_with = "inheritable_table")]
    pub inheritable: FieldNames,
}

fn fields_table<'de, D>(deserializer: D) -> std::result::Result<FieldNames, D::Error>
where
    D: Deserializer<'de>,
{
    overlay_table(deserializer, FieldNames::default())
}

fn inheritable_table<'de, D>(deserializer: D) -> std::result::Result<FieldNames, D::Error>
where
    D: Deserializer<'de>,
{
    overlay_table(deserializer, FieldNames::prefixed(INHERITABLE_PREFIX))
}

/// Overlay the given keys onto a default table
fn overlay_table<'de, D>(deserializer: D, defaults: FieldNames) -> std::result::Result<FieldNames, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = YamlValue::deserialize(deserializer)?;
    let mut merged = serde_yaml::to_value(defaults).map_err(D::Error::custom)?;
    merge_value(&mut merged, overrides);
    serde_yaml::from_value(merged).map_err(D::Error::custom)
}

/// Deep-merge `overrides` into `base`; nested mappings merge key by key
fn merge_value(base: &mut YamlValue, overrides: YamlValue) {
    match (base, overrides) {
        (_, YamlValue::Null) => {}
        (YamlValue::Mapping(base), YamlValue::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            fields: FieldNames::default(),
            inheritable: FieldNames::prefixed(INHERITABLE_PREFIX),
        }
    }
}

impl IndexConfig {
    /// Load an index config from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RightsError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate an index config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: IndexConfig = serde_yaml::from_str(content)
            .map_err(|e| RightsError::ValidationError(format!("Invalid index config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field tables
    ///
    /// Ensures:
    /// - no field name is empty
    /// - all names are unique across both tables, so inheritable output
    ///   never collides with normal output
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.fields.all().into_iter().chain(self.inheritable.all()) {
            if name.trim().is_empty() {
                return Err(RightsError::ValidationError(
                    "index field names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name) {
                return Err(RightsError::ValidationError(format!(
                    "duplicate index field name: {}",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
