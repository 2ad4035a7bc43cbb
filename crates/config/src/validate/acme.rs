//! ACME reference validation
//!
//! The legacy ACME block must point at an existing entry point, and that
//! entry point must terminate TLS.

use super::{ErrorCategory, ValidationError, ValidationResult};
use crate::EffectiveConfig;

/// Validate the entry point referenced by the ACME block
pub fn validate_acme(config: &EffectiveConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(acme) = &config.acme else {
        return result;
    };

    match config.entry_points.get(&acme.entry_point) {
        None => {
            result.add_error(ValidationError::new(
                ErrorCategory::EntryPoint,
                format!("Unknown entrypoint {:?} for ACME configuration", acme.entry_point),
            ));
        }
        Some(entry_point) if entry_point.tls.is_none() => {
            result.add_error(ValidationError::new(
                ErrorCategory::Tls,
                format!(
                    "Entrypoint {:?} has no TLS configuration for ACME configuration",
                    acme.entry_point
                ),
            ));
        }
        Some(_) => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acme::LegacyAcme;
    use crate::entry_points::{EntryPoint, EntryPointTls};

    fn config_with_acme(entry_point: &str) -> EffectiveConfig {
        EffectiveConfig {
            acme: Some(LegacyAcme {
                entry_point: entry_point.to_string(),
                storage: "acme.json".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_acme_is_valid() {
        let result = validate_acme(&EffectiveConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_unknown_entry_point() {
        let config = config_with_acme("https");

        let result = validate_acme(&config);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].category, ErrorCategory::EntryPoint);
        assert!(result.errors[0].message.contains("Unknown entrypoint"));
    }

    #[test]
    fn test_entry_point_without_tls() {
        let mut config = config_with_acme("https");
        config
            .entry_points
            .insert("https".to_string(), EntryPoint::new(":443"));

        let result = validate_acme(&config);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].category, ErrorCategory::Tls);
        assert!(result.errors[0].message.contains("has no TLS configuration"));
    }

    #[test]
    fn test_entry_point_with_tls() {
        let mut config = config_with_acme("https");
        config.entry_points.insert(
            "https".to_string(),
            EntryPoint {
                tls: Some(EntryPointTls::default()),
                ..EntryPoint::new(":443")
            },
        );

        assert!(validate_acme(&config).is_ok());
    }
}
