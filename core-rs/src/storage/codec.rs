//! Rights record codecs
//!
//! Defines the persistence boundary for rights records. A codec turns a
//! [`RightsRecord`] into bytes and back with full fidelity for every field.
//! Implementations:
//! - JsonCodec (serde_json)
//! - YamlCodec (serde_yaml)
//!
//! Permissions are written grouped by kind:
//!
//! ```yaml
//! permissions:
//!   group:
//!     archivist: edit
//!     public: read
//!   person:
//!     researcher1: edit
//! embargo_release_date: 2102-10-01T00:00:00Z
//! ```

use crate::errors::{Result, RightsError};
use crate::rights::RightsRecord;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Codec trait
///
/// All record formats must implement this interface. Loading must accept
/// anything saving produces.
pub trait RightsCodec: Send + Sync {
    /// Decode a record
    fn load(&self, bytes: &[u8]) -> Result<RightsRecord>;

    /// Encode a record
    fn save(&self, record: &RightsRecord) -> Result<Vec<u8>>;

    /// Format name (e.g., "json", "yaml")
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl RightsCodec for JsonCodec {
    fn load(&self, bytes: &[u8]) -> Result<RightsRecord> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn save(&self, record: &RightsRecord) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        Ok(bytes)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl RightsCodec for YamlCodec {
    fn load(&self, bytes: &[u8]) -> Result<RightsRecord> {
        Ok(serde_yaml::from_slice(bytes)?)
    }

    fn save(&self, record: &RightsRecord) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(record)?.into_bytes())
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}

/// On-disk record format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(RecordFormat::Json),
            Some("yaml") | Some("yml") => Ok(RecordFormat::Yaml),
            _ => Err(RightsError::UnsupportedFormat(path.to_string_lossy().to_string())),
        }
    }

    pub fn codec(&self) -> Box<dyn RightsCodec> {
        match self {
            RecordFormat::Json => Box::new(JsonCodec { pretty: true }),
            RecordFormat::Yaml => Box::new(YamlCodec),
        }
    }
}

/// Read a record from a `.json`, `.yaml` or `.yml` file
pub fn load_record<P: AsRef<Path>>(path: P) -> Result<RightsRecord> {
    let path = path.as_ref();
    let codec = RecordFormat::from_path(path)?.codec();

    if !path.exists() {
        return Err(RightsError::FileNotFound(path.to_string_lossy().to_string()));
    }

    let bytes = fs::read(path)?;
    debug!(path = %path.display(), format = codec.name(), "loading rights record");
    codec.load(&bytes)
}

/// Write a record to a `.json`, `.yaml` or `.yml` file
pub fn save_record<P: AsRef<Path>>(path: P, record: &RightsRecord) -> Result<()> {
    let path = path.as_ref();
    let codec = RecordFormat::from_path(path)?.codec();

    let bytes = codec.save(record)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    debug!(path = %path.display(), format = codec.name(), "saved rights record");
    Ok(())
}
