//! Local certificate store
//!
//! A single JSON file holding the ACME account and every issued certificate.
//! Binding a store to a path performs no I/O; the file is created on the
//! first save.
//!
//! # File Structure
//!
//! ```text
//! acme.json
//! ├── Account           # registration email, key, key type
//! └── Certificates[]    # domain, certificate chain and key (base64)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use portico_common::{Domain, KeyType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::StoreError;
use crate::migrate::{convert_to_new_format, FormatUpgrade};

/// Serde adapter storing byte fields as standard base64 strings.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// ACME account registered with the CA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    /// Contact email
    pub email: String,
    /// Registration resource URI returned by the CA
    #[serde(default)]
    pub registration_uri: Option<String>,
    /// Account private key (DER)
    #[serde(default, with = "base64_bytes")]
    pub private_key: Vec<u8>,
    #[serde(default)]
    pub key_type: KeyType,
    /// When the account was written to this store
    pub created: DateTime<Utc>,
}

/// An issued certificate and its private key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredCertificate {
    pub domain: Domain,
    /// PEM certificate chain
    #[serde(with = "base64_bytes")]
    pub certificate: Vec<u8>,
    /// PEM private key
    #[serde(with = "base64_bytes")]
    pub key: Vec<u8>,
}

/// Whole store content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct StoredData {
    pub account: Option<Account>,
    pub certificates: Vec<StoredCertificate>,
}

/// File-backed certificate store
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Bind a store to a file path. The file is not touched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(storage = %path.display(), "Bound ACME local store");
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store; a missing or empty file yields an empty store.
    pub fn load(&self) -> Result<StoredData, StoreError> {
        if !self.path.exists() {
            trace!(storage = %self.path.display(), "No ACME store file yet");
            return Ok(StoredData::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoredData::default());
        }

        let data: StoredData = serde_json::from_str(&content)?;
        debug!(
            storage = %self.path.display(),
            certificates = data.certificates.len(),
            has_account = data.account.is_some(),
            "Loaded ACME store"
        );
        Ok(data)
    }

    /// Write the whole store, restricting permissions on Unix
    pub fn save(&self, data: &StoredData) -> Result<(), StoreError> {
        write_store_file(&self.path, data)?;
        info!(
            storage = %self.path.display(),
            certificates = data.certificates.len(),
            "Saved ACME store"
        );
        Ok(())
    }

    /// Rewrite a legacy-format file in place. See [`convert_to_new_format`].
    pub fn upgrade_format(&self) -> Result<FormatUpgrade, StoreError> {
        convert_to_new_format(&self.path)
    }
}

pub(crate) fn write_store_file(path: &Path, data: &StoredData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(data)?;
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
