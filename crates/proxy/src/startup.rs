//! Startup configuration pipeline
//!
//! Runs once, before any listener is bound:
//!
//! 1. Load the static configuration (or fall back to the built-in defaults)
//! 2. Apply defaults and compatibility rewrites
//! 3. Validate; errors stop startup, lint warnings are logged
//! 4. Migrate the legacy ACME block to the ACME provider
//! 5. Freeze the result into a shared snapshot

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use portico_acme::AcmeProvider;
use portico_config::validate::ValidationWarning;
use portico_config::{ConfigError, EffectiveConfig, GlobalConfig, PendingConfig, ValidationResult};
use tracing::{error, info, warn};

/// Outcome of a successful startup
#[derive(Debug)]
pub struct Started {
    pub config: Arc<EffectiveConfig>,
    pub acme: Option<AcmeProvider>,
    /// Lint warnings, already logged
    pub warnings: Vec<ValidationWarning>,
}

fn load(config_path: Option<&Path>) -> Result<PendingConfig> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            let global =
                GlobalConfig::from_file(path).context("Failed to load configuration file")?;
            Ok(global.into_pending(&path.display().to_string()))
        }
        None => {
            info!("No configuration specified, using built-in defaults");
            Ok(GlobalConfig::default().into_pending(""))
        }
    }
}

fn validate(config: &EffectiveConfig) -> Result<ValidationResult> {
    let result = match config.validate() {
        Ok(result) => result,
        Err(ConfigError::Validation(result)) => {
            for e in &result.errors {
                error!(category = %e.category, "{}", e.message);
            }
            return Err(ConfigError::Validation(result))
                .context("Configuration validation failed");
        }
        Err(e) => return Err(e).context("Configuration validation failed"),
    };

    for warning in &result.warnings {
        warn!("{}", warning.message);
    }

    Ok(result)
}

/// Load and validate without touching the ACME store
pub fn check(config_path: Option<&Path>) -> Result<ValidationResult> {
    let pending = load(config_path)?;
    validate(&pending)
}

/// Run the whole startup pipeline
pub fn bootstrap(config_path: Option<&Path>) -> Result<Started> {
    let mut pending = load(config_path)?;
    let result = validate(&pending)?;

    let acme = match pending.init_acme_provider() {
        Ok(provider) => provider,
        Err(e) => {
            error!(error = %e, "Unable to initialize ACME provider, continuing without ACME");
            None
        }
    };

    let config = pending.freeze();
    report(&config, acme.as_ref());

    Ok(Started {
        config,
        acme,
        warnings: result.warnings,
    })
}

fn report(config: &EffectiveConfig, acme: Option<&AcmeProvider>) {
    info!("Effective configuration:");
    for name in config.entry_point_names() {
        if let Some(entry_point) = config.entry_point(name) {
            info!(
                entry_point = %name,
                address = %entry_point.address,
                tls = entry_point.tls.is_some(),
                "  - entry point"
            );
        }
    }
    info!("  - default entry points: {}", config.default_entry_points);

    if let Some(access_log) = &config.access_log {
        info!(
            file = %access_log.file_path,
            format = %access_log.format(),
            "  - access log"
        );
    }

    if let Some(tracing) = &config.tracing {
        info!(
            backend = %tracing.backend.name(),
            service_name = %tracing.service_name,
            "  - tracing"
        );
    }

    match acme {
        Some(provider) => info!(
            entry_point = %provider.entry_point(),
            storage = %provider.store().path().display(),
            domains = provider.domains().len(),
            "  - ACME provider"
        ),
        None if config.acme.is_some() => info!("  - ACME left to the cluster"),
        None => info!("  - ACME disabled"),
    }
}
