//! Error types for configuration and the resolution pipeline.

use std::path::PathBuf;

/// A missing or malformed configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value: {key}")]
    Missing { key: String },

    #[error("invalid configuration value {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors produced while resolving and persisting save paths.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to access {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("wiki client error: {0}")]
    Wiki(#[from] savekeep_pcgw::Error),
}
