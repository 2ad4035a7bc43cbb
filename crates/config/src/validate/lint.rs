//! Configuration linting
//!
//! Flags settings that are legal but probably not what the operator meant.
//! Nothing here stops startup.

use super::{ValidationResult, ValidationWarning};
use crate::acme::AcmeChallenge;
use crate::EffectiveConfig;

/// Lint the effective configuration
pub fn lint_config(config: &EffectiveConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    for name in config.default_entry_points.iter() {
        if !config.entry_points.contains_key(name) {
            result.add_warning(ValidationWarning::new(format!(
                "Default entry point '{}' is not defined",
                name
            )));
        }
    }

    for name in crate::sorted_names(&config.entry_points) {
        let entry_point = &config.entry_points[name];

        if let Some(redirect) = &entry_point.redirect {
            if !redirect.entry_point.is_empty()
                && !config.entry_points.contains_key(&redirect.entry_point)
            {
                result.add_warning(ValidationWarning::new(format!(
                    "Entry point '{}' redirects to undefined entry point '{}'",
                    name, redirect.entry_point
                )));
            }
        }

        if entry_point.port() == Some(80)
            && entry_point.tls.is_none()
            && entry_point.redirect.is_none()
        {
            result.add_warning(ValidationWarning::new(format!(
                "Entry point '{}' serves HTTP on port 80 without TLS (consider HTTPS redirect)",
                name
            )));
        }
    }

    if let Some(acme) = &config.acme {
        if let Err(e) = url::Url::parse(&acme.ca_server) {
            result.add_warning(ValidationWarning::new(format!(
                "ACME CA server '{}' is not a valid URL: {}",
                acme.ca_server, e
            )));
        }

        if let Some(AcmeChallenge::Http(http)) = &acme.challenge {
            if !config.entry_points.contains_key(&http.entry_point) {
                result.add_warning(ValidationWarning::new(format!(
                    "ACME HTTP challenge uses undefined entry point '{}'",
                    http.entry_point
                )));
            }
        }
    }

    if config.insecure_skip_verify {
        result.add_warning(ValidationWarning::new(
            "Backend certificate verification is disabled (insecureSkipVerify)".to_string(),
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acme::{HttpChallengeBlock, LegacyAcme};
    use crate::entry_points::{DefaultEntryPoints, EntryPoint, EntryPointTls, Redirect};

    fn test_entry_point(address: &str) -> EntryPoint {
        EntryPoint::new(address)
    }

    #[test]
    fn test_lint_undefined_default_entry_point() {
        let mut config = EffectiveConfig::default();
        config.default_entry_points = DefaultEntryPoints::new(vec!["https".to_string()]);

        let result = lint_config(&config);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("Default entry point 'https' is not defined")));
    }

    #[test]
    fn test_lint_redirect_to_undefined_entry_point() {
        let mut config = EffectiveConfig::default();
        config.entry_points.insert(
            "http".to_string(),
            EntryPoint {
                redirect: Some(Redirect {
                    entry_point: "https".to_string(),
                    ..Default::default()
                }),
                ..test_entry_point(":80")
            },
        );

        let result = lint_config(&config);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("redirects to undefined entry point 'https'")));
        // A redirect counts as handling plain HTTP
        assert!(!result.warnings.iter().any(|w| w.message.contains("without TLS")));
    }

    #[test]
    fn test_lint_http_on_port_80() {
        let mut config = EffectiveConfig::default();
        config
            .entry_points
            .insert("http".to_string(), test_entry_point("0.0.0.0:80"));

        let result = lint_config(&config);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("without TLS")));
    }

    #[test]
    fn test_lint_tls_on_port_80_is_quiet() {
        let mut config = EffectiveConfig::default();
        config.entry_points.insert(
            "odd".to_string(),
            EntryPoint {
                tls: Some(EntryPointTls::default()),
                ..test_entry_point(":80")
            },
        );

        assert!(lint_config(&config).warnings.is_empty());
    }

    #[test]
    fn test_lint_acme_settings() {
        let mut config = EffectiveConfig::default();
        config.acme = Some(LegacyAcme {
            ca_server: "not a url".to_string(),
            challenge: Some(AcmeChallenge::Http(HttpChallengeBlock {
                entry_point: "http".to_string(),
            })),
            ..Default::default()
        });

        let result = lint_config(&config);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("is not a valid URL")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("HTTP challenge uses undefined entry point 'http'")));
    }

    #[test]
    fn test_lint_insecure_skip_verify() {
        let config = EffectiveConfig {
            insecure_skip_verify: true,
            ..Default::default()
        };

        let result = lint_config(&config);

        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("insecureSkipVerify")));
    }
}
