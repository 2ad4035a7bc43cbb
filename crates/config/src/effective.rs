//! Effective configuration
//!
//! [`GlobalConfig::set_effective_configuration`] fills defaults and applies
//! the compatibility rewrites in place. [`GlobalConfig::into_pending`] then
//! collapses the raw blocks into their effective shape and hands out a
//! [`PendingConfig`], which owns the configuration until it is frozen.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use portico_acme::AcmeProvider;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::acme::{AcmeMigration, LegacyAcme};
use crate::entry_points::{DefaultEntryPoints, EntryPoint, EntryPoints, ForwardedHeaders};
use crate::error::ConfigError;
use crate::logs::{AccessLog, TraefikLog};
use crate::providers::{
    ApiConfig, FileProvider, MetricsConfig, PingConfig, RancherProvider, RestProvider,
};
use crate::server::{
    ClusterConfig, ForwardingTimeouts, HealthCheckConfig, HostResolverConfig, LifeCycle,
    RespondingTimeouts, Retry,
};
use crate::tracer::Tracing;
use crate::validate::{lint_config, validate_acme, ValidationResult};
use crate::{
    sorted_names, GlobalConfig, DEFAULT_HTTP_ENTRY_POINT_ADDRESS, DEFAULT_INTERNAL_ENTRY_POINT,
    DEFAULT_INTERNAL_ENTRY_POINT_ADDRESS,
};

impl GlobalConfig {
    /// Fill defaults and apply compatibility rewrites.
    ///
    /// `config_file` is the resolved path of the static configuration file,
    /// recorded on the file provider. Running this twice gives the same
    /// result as running it once.
    pub fn set_effective_configuration(&mut self, config_file: &str) {
        if self.entry_points.is_empty() {
            debug!(
                address = DEFAULT_HTTP_ENTRY_POINT_ADDRESS,
                "No entry point configured, using default http entry point"
            );
            self.entry_points.insert(
                "http".to_string(),
                EntryPoint {
                    forwarded_headers: Some(ForwardedHeaders::default()),
                    ..EntryPoint::new(DEFAULT_HTTP_ENTRY_POINT_ADDRESS)
                },
            );
            self.default_entry_points = DefaultEntryPoints::new(vec!["http".to_string()]);
        }

        if self.uses_internal_entry_point()
            && !self.entry_points.contains_key(DEFAULT_INTERNAL_ENTRY_POINT)
        {
            debug!(
                entry_point = DEFAULT_INTERNAL_ENTRY_POINT,
                address = DEFAULT_INTERNAL_ENTRY_POINT_ADDRESS,
                "Adding internal entry point"
            );
            self.entry_points.insert(
                DEFAULT_INTERNAL_ENTRY_POINT.to_string(),
                EntryPoint::new(DEFAULT_INTERNAL_ENTRY_POINT_ADDRESS),
            );
        }

        for (name, entry_point) in self.entry_points.iter_mut() {
            entry_point.apply_defaults(name);
        }

        self.life_cycle.get_or_insert_with(LifeCycle::default);

        if let Some(rancher) = self.rancher.as_mut() {
            rancher.apply_compat();
        }

        if let Some(api) = self.api.as_mut() {
            api.debug = self.debug;
        }

        if let Some(file) = self.file.as_mut() {
            file.static_config_file = config_file.to_string();
        }

        if let Some(acme) = self.acme.as_mut() {
            acme.normalize();
        }

        if let Some(tracing) = self.tracing.as_mut() {
            tracing.resolve_backend();
        }
    }

    /// Whether a block served on the internal entry point refers to it
    fn uses_internal_entry_point(&self) -> bool {
        let internal = |entry_point: &str| entry_point == DEFAULT_INTERNAL_ENTRY_POINT;

        self.api.as_ref().is_some_and(|api| internal(&api.entry_point))
            || self.ping.as_ref().is_some_and(|ping| internal(&ping.entry_point))
            || self
                .metrics
                .as_ref()
                .and_then(|metrics| metrics.prometheus.as_ref())
                .is_some_and(|prometheus| internal(&prometheus.entry_point))
            || self.rest.as_ref().is_some_and(|rest| internal(&rest.entry_point))
    }

    /// Run the defaulting pass and take ownership of the result.
    pub fn into_pending(mut self, config_file: &str) -> PendingConfig {
        self.set_effective_configuration(config_file);

        let config = EffectiveConfig {
            life_cycle: self.life_cycle.unwrap_or_default(),
            debug: self.debug,
            check_new_version: self.check_new_version,
            send_anonymous_usage: self.send_anonymous_usage,
            access_log: self.access_log,
            traefik_log: self.traefik_log,
            log_level: self.log_level,
            tracing: self.tracing.map(Tracing::from),
            entry_points: self.entry_points,
            default_entry_points: self.default_entry_points,
            cluster: self.cluster,
            constraints: self.constraints,
            acme: self.acme.map(LegacyAcme::from),
            providers_throttle_duration_secs: self.providers_throttle_duration_secs,
            max_idle_conns_per_host: self.max_idle_conns_per_host,
            insecure_skip_verify: self.insecure_skip_verify,
            root_cas: self.root_cas,
            retry: self.retry,
            health_check: self.health_check,
            responding_timeouts: self.responding_timeouts.unwrap_or_default(),
            forwarding_timeouts: self.forwarding_timeouts.unwrap_or_default(),
            keep_trailing_slash: self.keep_trailing_slash,
            file: self.file,
            rest: self.rest,
            rancher: self.rancher,
            api: self.api,
            metrics: self.metrics,
            ping: self.ping,
            host_resolver: self.host_resolver,
        };

        PendingConfig { config }
    }
}

/// Fully defaulted configuration
///
/// Shared read-only once frozen; see [`PendingConfig::freeze`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub life_cycle: LifeCycle,
    pub debug: bool,
    pub check_new_version: bool,
    pub send_anonymous_usage: bool,
    pub access_log: Option<AccessLog>,
    pub traefik_log: Option<TraefikLog>,
    pub log_level: String,
    pub tracing: Option<Tracing>,

    pub entry_points: EntryPoints,
    pub default_entry_points: DefaultEntryPoints,
    pub cluster: Option<ClusterConfig>,
    pub constraints: Vec<String>,
    /// Legacy ACME block; cleared once migrated to the provider
    pub acme: Option<LegacyAcme>,

    #[serde(rename = "providersThrottleDuration")]
    pub providers_throttle_duration_secs: u64,
    pub max_idle_conns_per_host: usize,
    pub insecure_skip_verify: bool,
    #[serde(rename = "rootCAs")]
    pub root_cas: Vec<String>,
    pub retry: Option<Retry>,
    pub health_check: Option<HealthCheckConfig>,
    pub responding_timeouts: RespondingTimeouts,
    pub forwarding_timeouts: ForwardingTimeouts,
    pub keep_trailing_slash: bool,

    pub file: Option<FileProvider>,
    pub rest: Option<RestProvider>,
    pub rancher: Option<RancherProvider>,
    pub api: Option<ApiConfig>,
    pub metrics: Option<MetricsConfig>,
    pub ping: Option<PingConfig>,
    pub host_resolver: Option<HostResolverConfig>,
}

impl EffectiveConfig {
    /// Check cross references.
    ///
    /// Errors come back as [`ConfigError::Validation`]; the caller is
    /// expected to stop. On success the lint warnings are returned.
    pub fn validate(&self) -> Result<ValidationResult, ConfigError> {
        let mut result = validate_acme(self);
        if !result.is_ok() {
            return Err(ConfigError::Validation(result));
        }

        result.merge(lint_config(self));
        Ok(result)
    }

    /// Legacy cluster mode is configured
    pub fn cluster_mode(&self) -> bool {
        self.cluster.is_some()
    }

    pub fn entry_point(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.get(name)
    }

    /// Entry point names, sorted
    pub fn entry_point_names(&self) -> Vec<&str> {
        sorted_names(&self.entry_points)
            .into_iter()
            .map(String::as_str)
            .collect()
    }

    pub fn providers_throttle_duration(&self) -> Duration {
        Duration::from_secs(self.providers_throttle_duration_secs)
    }

    /// Health check settings, with the built-in defaults when unset
    pub fn health_check(&self) -> HealthCheckConfig {
        self.health_check.unwrap_or_default()
    }
}

/// Effective configuration still owned by the startup sequence
#[derive(Debug)]
pub struct PendingConfig {
    config: EffectiveConfig,
}

impl Deref for PendingConfig {
    type Target = EffectiveConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

impl PendingConfig {
    /// Migrate the legacy ACME block into an [`AcmeProvider`].
    ///
    /// The block is consumed unless legacy cluster mode keeps it. Once it is
    /// gone, later calls return `Ok(None)`. A failed store format upgrade is
    /// logged and does not fail the migration.
    pub fn init_acme_provider(&mut self) -> Result<Option<AcmeProvider>, ConfigError> {
        let Some(acme) = self.config.acme.take() else {
            return Ok(None);
        };

        match acme.migrate(self.config.cluster_mode()) {
            AcmeMigration::MissingStorage => Err(ConfigError::AcmeStorageMissing),
            AcmeMigration::Retained(acme) => {
                debug!(
                    entry_point = %acme.entry_point,
                    "Cluster mode configured, leaving ACME to the cluster"
                );
                self.config.acme = Some(acme);
                Ok(None)
            }
            AcmeMigration::Converted(configuration) => {
                let provider = AcmeProvider::new(configuration);

                match provider.store().upgrade_format() {
                    Ok(outcome) => {
                        debug!(
                            storage = %provider.store().path().display(),
                            outcome = ?outcome,
                            "Checked ACME store format"
                        );
                    }
                    Err(e) => {
                        warn!(
                            storage = %provider.store().path().display(),
                            error = %e,
                            "Unable to upgrade ACME store format"
                        );
                    }
                }

                info!(
                    entry_point = %provider.entry_point(),
                    domains = provider.domains().len(),
                    "ACME provider initialized"
                );
                Ok(Some(provider))
            }
        }
    }

    /// Finish the startup sequence. The snapshot cannot be changed again.
    pub fn freeze(self) -> Arc<EffectiveConfig> {
        Arc::new(self.config)
    }
}
