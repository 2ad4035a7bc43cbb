//! Proxy and access log settings.
//!
//! Carried as written; the log writers themselves live outside this crate.
//!
//! ```toml
//! [traefikLog]
//! filePath = "/var/log/portico/portico.log"
//! format = "json"
//!
//! [accessLog]
//! filePath = "/var/log/portico/access.log"
//! bufferingSize = 100
//!
//! [accessLog.filters]
//! statusCodes = ["200", "300-302"]
//! retryAttempts = true
//! minDuration = 10
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Format used when none is configured
pub const DEFAULT_LOG_FORMAT: &str = "common";

/// Proxy log destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraefikLog {
    /// Stdout when empty
    #[serde(alias = "file")]
    pub file_path: String,
    /// `json` or `common`
    pub format: String,
}

/// Access log destination and filtering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessLog {
    /// Stdout when empty
    #[serde(alias = "file")]
    pub file_path: String,
    /// `json` or `common`
    pub format: String,
    pub filters: Option<AccessLogFilters>,
    pub fields: Option<AccessLogFields>,
    /// Lines processed per batch; zero writes each line directly
    pub buffering_size: u64,
}

impl AccessLog {
    pub fn format(&self) -> &str {
        if self.format.is_empty() {
            DEFAULT_LOG_FORMAT
        } else {
            &self.format
        }
    }
}

/// Keep only the matching access log lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessLogFilters {
    /// Codes or ranges, e.g. `"200"` or `"500-599"`
    pub status_codes: Vec<String>,
    pub retry_attempts: bool,
    #[serde(rename = "minDuration")]
    pub min_duration_secs: u64,
}

/// Which fields an access log line keeps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessLogFields {
    /// `keep`, `drop` or `redact`
    pub default_mode: String,
    pub names: HashMap<String, String>,
    pub headers: Option<FieldHeaders>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldHeaders {
    pub default_mode: String,
    pub names: HashMap<String, String>,
}
