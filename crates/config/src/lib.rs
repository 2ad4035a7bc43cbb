//! Portico Configuration
//!
//! Loads the static configuration file and turns it into the effective
//! configuration the proxy runs with:
//!
//! 1. [`GlobalConfig::from_file`] parses TOML or JSON into the raw aggregate.
//! 2. [`GlobalConfig::into_pending`] fills defaults, applies compatibility
//!    rewrites and settles the ACME challenge and tracing backend.
//! 3. [`EffectiveConfig::validate`] rejects dangling references.
//! 4. [`PendingConfig::init_acme_provider`] migrates the legacy ACME block.
//! 5. [`PendingConfig::freeze`] hands out the shared read-only snapshot.
//!
//! # Example
//!
//! ```ignore
//! use portico_config::GlobalConfig;
//!
//! let mut pending = GlobalConfig::from_file("portico.toml")?.into_pending("portico.toml");
//! pending.validate()?;
//! let provider = pending.init_acme_provider()?;
//! let config = pending.freeze();
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod acme;
pub mod ca_server;
mod effective;
pub mod entry_points;
pub mod error;
pub mod logs;
pub mod providers;
pub mod server;
pub mod tracer;
pub mod validate;

// ============================================================================
// Public API Re-exports
// ============================================================================

pub use acme::{AcmeBlock, AcmeChallenge, AcmeMigration, LegacyAcme};
pub use ca_server::{safe_ca_server, DEFAULT_ACME_CA_SERVER};
pub use effective::{EffectiveConfig, PendingConfig};
pub use entry_points::{DefaultEntryPoints, EntryPoint, EntryPointTls, EntryPoints};
pub use error::ConfigError;
pub use logs::{AccessLog, TraefikLog};
pub use providers::{
    ApiConfig, FileProvider, MetricsConfig, PingConfig, RancherProvider, RestProvider,
};
pub use server::{
    ClusterConfig, ForwardingTimeouts, HealthCheckConfig, HostResolverConfig, LifeCycle,
    RespondingTimeouts, Retry,
};
pub use tracer::{Tracing, TracingBackend, TracingConfig};
pub use validate::{lint_config, validate_acme, ValidationResult};

// ============================================================================
// Constants
// ============================================================================

/// Name of the entry point serving the API, ping, metrics and REST endpoints
pub const DEFAULT_INTERNAL_ENTRY_POINT: &str = "traefik";

/// Address of the entry point synthesized when none is configured
pub const DEFAULT_HTTP_ENTRY_POINT_ADDRESS: &str = ":80";

/// Address of the internal entry point when it has to be synthesized
pub const DEFAULT_INTERNAL_ENTRY_POINT_ADDRESS: &str = ":8080";

// ============================================================================
// Raw configuration
// ============================================================================

/// Static configuration as written in the file
///
/// Every block is optional. Nothing here is defaulted beyond what serde
/// fills in; see [`GlobalConfig::set_effective_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalConfig {
    pub life_cycle: Option<LifeCycle>,
    pub debug: bool,
    pub check_new_version: bool,
    pub send_anonymous_usage: bool,
    pub access_log: Option<AccessLog>,
    pub traefik_log: Option<TraefikLog>,
    pub log_level: String,
    pub tracing: Option<TracingConfig>,

    pub entry_points: EntryPoints,
    pub default_entry_points: DefaultEntryPoints,
    pub cluster: Option<ClusterConfig>,
    /// Service tag filters, e.g. `"tag==api"`
    pub constraints: Vec<String>,
    #[serde(alias = "ACME")]
    pub acme: Option<AcmeBlock>,

    /// Minimum time between two provider events before a reload
    #[serde(rename = "providersThrottleDuration")]
    pub providers_throttle_duration_secs: u64,
    pub max_idle_conns_per_host: usize,
    /// Skip TLS verification of backend certificates
    pub insecure_skip_verify: bool,
    /// Extra CA certificates trusted for backends
    #[serde(rename = "rootCAs")]
    pub root_cas: Vec<String>,
    pub retry: Option<Retry>,
    pub health_check: Option<HealthCheckConfig>,
    pub responding_timeouts: Option<RespondingTimeouts>,
    pub forwarding_timeouts: Option<ForwardingTimeouts>,
    pub keep_trailing_slash: bool,

    pub file: Option<FileProvider>,
    pub rest: Option<RestProvider>,
    pub rancher: Option<RancherProvider>,
    pub api: Option<ApiConfig>,
    pub metrics: Option<MetricsConfig>,
    pub ping: Option<PingConfig>,
    pub host_resolver: Option<HostResolverConfig>,
}

impl GlobalConfig {
    /// Load from a file. `.json` files are parsed as JSON, anything else as
    /// TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let origin = path.display().to_string();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            parse_json(&content, &origin)?
        } else {
            parse_toml(&content, &origin)?
        };

        trace!(
            path = %path.display(),
            entry_points = config.entry_points.len(),
            acme = config.acme.is_some(),
            "Parsed configuration file"
        );

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        parse_toml(content, "<inline>")
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        parse_json(content, "<inline>")
    }

    /// Names of the entry points declared in the file
    pub fn entry_point_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entry_points.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn parse_toml(content: &str, origin: &str) -> Result<GlobalConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Toml {
        origin: origin.to_string(),
        source,
    })
}

fn parse_json(content: &str, origin: &str) -> Result<GlobalConfig, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Entry points keyed by name, sorted for stable output
pub(crate) fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut names: Vec<&String> = map.keys().collect();
    names.sort();
    names
}
