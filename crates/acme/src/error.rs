//! Error types for the ACME store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, writing or upgrading the certificate store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store content is not valid JSON for the expected shape
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A base64 field could not be decoded
    #[error("invalid base64 in store: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The file is JSON but neither the current nor the legacy layout
    #[error("unrecognized store format in {path:?}: {reason}")]
    UnknownFormat { path: PathBuf, reason: String },
}
