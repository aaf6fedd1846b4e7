use std::path::PathBuf;

use dg_core::{ConfigError, GenerationError};
use thiserror::Error;

/// Template loading and floor file errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot parse '{text}' as {what}")]
    Parse { what: &'static str, text: String },

    #[error("Invalid template {name}: {reason}")]
    Invalid { name: String, reason: String },

    #[error("Unknown map generator: {0}")]
    UnknownGenerator(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Invalid floor file header")]
    InvalidHeader,

    #[error("Incompatible floor file version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },
}

impl TemplateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TemplateError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TemplateError::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
