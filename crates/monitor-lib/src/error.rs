//! Error types for monitoring synthesis

use std::path::PathBuf;

/// Errors raised while loading the monitoring document or applying resources
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The monitoring document could not be read
    #[error("failed to read monitoring config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The monitoring document is not valid YAML, TOML or JSON for the model
    #[error("failed to parse monitoring config {path:?}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The document parsed but breaks a structural invariant
    #[error("invalid monitoring config: {0}")]
    InvalidConfig(String),

    /// A remote create-or-replace or lookup call was rejected
    #[error("{operation} failed: {message}")]
    Remote { operation: &'static str, message: String },

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("failed to serialize resource body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MonitorError {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        MonitorError::Remote {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
