//! Error types for configuration loading and the startup pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationResult;

/// Errors raised while loading or reconciling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for the expected shape
    #[error("failed to parse TOML configuration {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is not valid JSON for the expected shape
    #[error("failed to parse JSON configuration {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The effective configuration is inconsistent; startup must stop
    #[error("configuration validation failed: {0}")]
    Validation(ValidationResult),

    /// ACME is enabled but has nowhere to keep certificates
    #[error("unable to initialize ACME provider with no storage location for the certificates")]
    AcmeStorageMissing,
}
