//! Entry point configuration
//!
//! An entry point is a named listener. The map key is the entry point name:
//!
//! ```toml
//! [entryPoints.http]
//! address = ":80"
//!
//! [entryPoints.http.redirect]
//! entryPoint = "https"
//!
//! [entryPoints.https]
//! address = ":443"
//!
//! [[entryPoints.https.tls.certificates]]
//! certFile = "/etc/portico/example.crt"
//! keyFile = "/etc/portico/example.key"
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

/// Entry points keyed by name
pub type EntryPoints = HashMap<String, EntryPoint>;

/// A named network listener
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryPoint {
    /// Bind address, e.g. ":443" or "0.0.0.0:8080"
    pub address: String,
    pub tls: Option<EntryPointTls>,
    pub redirect: Option<Redirect>,
    pub forwarded_headers: Option<ForwardedHeaders>,
    /// Compress responses
    pub compress: bool,
}

impl EntryPoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Port part of the bind address, if it has one
    pub fn port(&self) -> Option<u16> {
        self.address
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
    }

    /// Fill per-entry-point defaults.
    ///
    /// Forwarded headers are never left absent, and a TLS block with
    /// certificates but no default certificate uses the first one.
    pub(crate) fn apply_defaults(&mut self, name: &str) {
        if self.forwarded_headers.is_none() {
            trace!(entry_point = %name, "Using default forwarded headers policy");
            self.forwarded_headers = Some(ForwardedHeaders::default());
        }

        if let Some(tls) = self.tls.as_mut() {
            if tls.default_certificate.is_none() {
                if let Some(first) = tls.certificates.first() {
                    info!(
                        entry_point = %name,
                        cert_file = %first.cert_file,
                        "No tls.defaultCertificate given: using the first item in tls.certificates as a fallback"
                    );
                    tls.default_certificate = Some(first.clone());
                }
            }
        }
    }
}

/// TLS settings of an entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryPointTls {
    /// Minimum protocol version, e.g. "VersionTLS12"
    pub min_version: String,
    pub cipher_suites: Vec<String>,
    pub certificates: Vec<Certificate>,
    /// Served when no SNI match is found
    pub default_certificate: Option<Certificate>,
    #[serde(rename = "clientCA")]
    pub client_ca: Option<ClientCa>,
    /// Reject handshakes without a matching SNI
    pub sni_strict: bool,
}

/// A certificate/key pair, given as file paths or inline PEM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificate {
    pub cert_file: String,
    pub key_file: String,
}

impl Certificate {
    pub fn new(cert_file: impl Into<String>, key_file: impl Into<String>) -> Self {
        Self {
            cert_file: cert_file.into(),
            key_file: key_file.into(),
        }
    }
}

/// Client certificate authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientCa {
    pub files: Vec<String>,
    /// Accept clients that present no certificate
    pub optional: bool,
}

/// Redirect every request to another entry point or URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Redirect {
    pub entry_point: String,
    pub regex: String,
    pub replacement: String,
    pub permanent: bool,
}

/// Trust policy for X-Forwarded-* headers sent by clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardedHeaders {
    /// Trust headers from any client
    pub insecure: bool,
    /// Networks whose headers are trusted
    #[serde(rename = "trustedIPs")]
    pub trusted_ips: Vec<String>,
}

/// Entry points used by frontends that do not name any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultEntryPoints(Vec<String>);

impl DefaultEntryPoints {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for DefaultEntryPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
