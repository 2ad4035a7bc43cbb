//! Provider and internal-service blocks
//!
//! Only the data shapes live here; each provider's client runs elsewhere.
//! The blocks that can be served on the internal entry point (API, ping,
//! Prometheus metrics, REST) default their `entryPoint` to
//! [`DEFAULT_INTERNAL_ENTRY_POINT`](crate::DEFAULT_INTERNAL_ENTRY_POINT).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::DEFAULT_INTERNAL_ENTRY_POINT;

/// Metadata prefix used when the Rancher metadata block leaves it empty
pub const DEFAULT_RANCHER_METADATA_PREFIX: &str = "latest";

fn default_internal_entry_point() -> String {
    DEFAULT_INTERNAL_ENTRY_POINT.to_string()
}

/// API and dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub entry_point: String,
    pub dashboard: bool,
    /// Mirrors the global debug flag after defaulting
    pub debug: bool,
    pub statistics: Option<Statistics>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            entry_point: default_internal_entry_point(),
            dashboard: true,
            debug: false,
            statistics: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub recent_errors: usize,
}

impl Default for Statistics {
    fn default() -> Self {
        Self { recent_errors: 10 }
    }
}

/// Health ping endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PingConfig {
    pub entry_point: String,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            entry_point: default_internal_entry_point(),
        }
    }
}

/// Metrics exporters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsConfig {
    pub prometheus: Option<PrometheusConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrometheusConfig {
    pub entry_point: String,
    /// Histogram buckets, in seconds
    pub buckets: Vec<f64>,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            entry_point: default_internal_entry_point(),
            buckets: vec![0.1, 0.3, 1.2, 5.0],
        }
    }
}

/// REST provider: configuration pushed over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestProvider {
    pub entry_point: String,
}

impl Default for RestProvider {
    fn default() -> Self {
        Self {
            entry_point: default_internal_entry_point(),
        }
    }
}

/// File provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileProvider {
    /// Dynamic configuration file
    pub filename: String,
    /// Directory of dynamic configuration files
    pub directory: String,
    pub watch: bool,
    /// Path of the static configuration file, set during defaulting
    pub static_config_file: String,
}

/// Rancher provider
///
/// The flat `endpoint`/`accessKey`/`secretKey` fields are deprecated in favor
/// of the nested `api` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RancherProvider {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub api: Option<RancherApi>,
    pub metadata: Option<RancherMetadata>,
    /// Default base domain for generated frontend rules
    pub domain: String,
    pub refresh_seconds: u64,
    pub exposed_by_default: bool,
}

impl Default for RancherProvider {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            api: None,
            metadata: None,
            domain: String::new(),
            refresh_seconds: 15,
            exposed_by_default: true,
        }
    }
}

/// Rancher API credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RancherApi {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Rancher metadata service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RancherMetadata {
    pub interval_poll: bool,
    pub prefix: String,
}

impl RancherProvider {
    fn has_flat_credentials(&self) -> bool {
        !self.access_key.is_empty() || !self.endpoint.is_empty() || !self.secret_key.is_empty()
    }

    /// Move the deprecated flat credentials into the `api` block and default
    /// the metadata prefix.
    pub(crate) fn apply_compat(&mut self) {
        if self.has_flat_credentials() {
            if self.api.is_none() {
                self.api = Some(RancherApi {
                    access_key: self.access_key.clone(),
                    secret_key: self.secret_key.clone(),
                    endpoint: self.endpoint.clone(),
                });
            }
            warn!(
                "Deprecated configuration found: rancher.[accessKey|secretKey|endpoint]. \
                 Please use rancher.api.[accessKey|secretKey|endpoint] instead."
            );
        }

        if let Some(metadata) = self.metadata.as_mut() {
            if metadata.prefix.is_empty() {
                debug!(prefix = DEFAULT_RANCHER_METADATA_PREFIX, "Using default Rancher metadata prefix");
                metadata.prefix = DEFAULT_RANCHER_METADATA_PREFIX.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_internal_services_default_to_internal_entry_point() {
        assert_eq!(ApiConfig::default().entry_point, "traefik");
        assert_eq!(PingConfig::default().entry_point, "traefik");
        assert_eq!(PrometheusConfig::default().entry_point, "traefik");
        assert_eq!(RestProvider::default().entry_point, "traefik");
    }

    #[traced_test]
    #[test]
    fn test_rancher_flat_credentials_migrated() {
        let mut rancher = RancherProvider {
            access_key: "A".to_string(),
            secret_key: "B".to_string(),
            endpoint: "E".to_string(),
            ..Default::default()
        };
        rancher.apply_compat();

        assert_eq!(
            rancher.api,
            Some(RancherApi {
                access_key: "A".to_string(),
                secret_key: "B".to_string(),
                endpoint: "E".to_string(),
            })
        );
        assert!(logs_contain(
            "Deprecated configuration found: rancher.[accessKey|secretKey|endpoint]"
        ));
    }

    #[test]
    fn test_rancher_partial_flat_credentials_migrated() {
        let mut rancher = RancherProvider {
            endpoint: "http://rancher:8080".to_string(),
            ..Default::default()
        };
        rancher.apply_compat();

        let api = rancher.api.unwrap();
        assert_eq!(api.endpoint, "http://rancher:8080");
        assert!(api.access_key.is_empty());
    }

    #[test]
    fn test_rancher_existing_api_kept() {
        let existing = RancherApi {
            access_key: "nested".to_string(),
            ..Default::default()
        };
        let mut rancher = RancherProvider {
            access_key: "flat".to_string(),
            api: Some(existing.clone()),
            ..Default::default()
        };
        rancher.apply_compat();
        assert_eq!(rancher.api, Some(existing));
    }

    #[traced_test]
    #[test]
    fn test_rancher_without_credentials_gets_no_api() {
        let mut rancher = RancherProvider::default();
        rancher.apply_compat();
        assert!(rancher.api.is_none());
        assert!(!logs_contain("Deprecated configuration found"));
    }

    #[test]
    fn test_rancher_metadata_prefix_defaulted() {
        let mut rancher = RancherProvider {
            metadata: Some(RancherMetadata::default()),
            ..Default::default()
        };
        rancher.apply_compat();
        assert_eq!(rancher.metadata.unwrap().prefix, "latest");

        let mut custom = RancherProvider {
            metadata: Some(RancherMetadata {
                interval_poll: true,
                prefix: "2016-07-29".to_string(),
            }),
            ..Default::default()
        };
        custom.apply_compat();
        assert_eq!(custom.metadata.unwrap().prefix, "2016-07-29");
    }
}
