//! One-time upgrade of legacy store files
//!
//! The legacy layout kept the account at the top level and nested every
//! certificate under `DomainsCertificate.Certs`:
//!
//! ```json
//! {
//!   "Email": "admin@example.com",
//!   "Registration": { "uri": "https://..." },
//!   "PrivateKey": "<base64>",
//!   "DomainsCertificate": {
//!     "Certs": [
//!       {
//!         "Domains": { "Main": "example.com", "SANs": ["www.example.com"] },
//!         "Certificate": { "Domain": "example.com", "PrivateKey": "<base64>", "Certificate": "<base64>" }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! The upgrade keeps a `.bak` copy of the legacy file next to it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use portico_common::{Domain, KeyType};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::{base64_bytes, write_store_file, Account, StoredCertificate, StoredData};

/// Outcome of [`convert_to_new_format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatUpgrade {
    /// No store file (or an empty one) at the path
    NotFound,
    /// The file already uses the current layout
    AlreadyCurrent,
    /// The legacy file was rewritten
    Converted { certificates: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyStore {
    #[serde(default)]
    email: String,
    #[serde(default)]
    registration: Option<LegacyRegistration>,
    #[serde(default, with = "base64_bytes")]
    private_key: Vec<u8>,
    #[serde(default)]
    key_type: KeyType,
    #[serde(default)]
    domains_certificate: Option<LegacyDomainsCertificates>,
}

#[derive(Debug, Deserialize)]
struct LegacyRegistration {
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyDomainsCertificates {
    #[serde(default)]
    certs: Vec<LegacyDomainsCertificate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyDomainsCertificate {
    domains: LegacyDomain,
    #[serde(default)]
    certificate: Option<LegacyCertificate>,
}

#[derive(Debug, Deserialize)]
struct LegacyDomain {
    #[serde(rename = "Main", default)]
    main: String,
    #[serde(rename = "SANs", default)]
    sans: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyCertificate {
    #[serde(default, with = "base64_bytes")]
    private_key: Vec<u8>,
    #[serde(default, with = "base64_bytes")]
    certificate: Vec<u8>,
}

impl LegacyStore {
    fn into_stored_data(self) -> StoredData {
        let account = if self.email.is_empty() && self.private_key.is_empty() {
            None
        } else {
            Some(Account {
                email: self.email,
                registration_uri: self
                    .registration
                    .map(|registration| registration.uri)
                    .filter(|uri| !uri.is_empty()),
                private_key: self.private_key,
                key_type: self.key_type,
                created: Utc::now(),
            })
        };

        let certificates = self
            .domains_certificate
            .unwrap_or_default()
            .certs
            .into_iter()
            .filter_map(|entry| {
                let domain = Domain {
                    main: entry.domains.main,
                    sans: entry.domains.sans,
                };
                match entry.certificate {
                    Some(cert) if !cert.certificate.is_empty() => Some(StoredCertificate {
                        domain,
                        certificate: cert.certificate,
                        key: cert.private_key,
                    }),
                    _ => {
                        debug!(domain = %domain, "Skipping legacy entry without certificate");
                        None
                    }
                }
            })
            .collect();

        StoredData {
            account,
            certificates,
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Rewrite the store file at `path` in the current layout if it still uses
/// the legacy one.
pub fn convert_to_new_format(path: &Path) -> Result<FormatUpgrade, StoreError> {
    if !path.exists() {
        debug!(storage = %path.display(), "No store file to upgrade");
        return Ok(FormatUpgrade::NotFound);
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(FormatUpgrade::NotFound);
    }

    let value: serde_json::Value = serde_json::from_str(&content)?;
    let Some(object) = value.as_object() else {
        return Err(StoreError::UnknownFormat {
            path: path.to_path_buf(),
            reason: "top level is not a JSON object".to_string(),
        });
    };

    if object.is_empty() || object.contains_key("Account") || object.contains_key("Certificates") {
        debug!(storage = %path.display(), "Store already in current format");
        return Ok(FormatUpgrade::AlreadyCurrent);
    }

    if !object.contains_key("DomainsCertificate") && !object.contains_key("Email") {
        return Err(StoreError::UnknownFormat {
            path: path.to_path_buf(),
            reason: "expected Account/Certificates or Email/DomainsCertificate keys".to_string(),
        });
    }

    let legacy: LegacyStore = serde_json::from_value(value)?;
    let data = legacy.into_stored_data();

    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    write_store_file(path, &data)?;

    if data.account.is_none() {
        warn!(storage = %path.display(), "Legacy store had no account; a new one will be registered");
    }
    info!(
        storage = %path.display(),
        backup = %backup.display(),
        certificates = data.certificates.len(),
        "Converted ACME store to the current format"
    );

    Ok(FormatUpgrade::Converted {
        certificates: data.certificates.len(),
    })
}
