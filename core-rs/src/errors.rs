//! Error types for Hydra Rights

use crate::evaluator::Action;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RightsError {
    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid permission level: {0}")]
    InvalidLevel(String),

    #[error("Invalid principal kind: {0}")]
    InvalidPrincipalKind(String),

    #[error("Access denied for {action}: {message}")]
    AccessDenied { action: Action, message: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported record format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RightsError {
    /// Name of the record field an input error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RightsError::InvalidDate { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RightsError>;
