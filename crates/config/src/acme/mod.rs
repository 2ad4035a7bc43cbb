//! Legacy ACME block
//!
//! The `[acme]` block predates the current ACME provider. During startup it
//! is normalized in place ([`AcmeBlock::normalize`]), collapsed into a
//! [`LegacyAcme`] whose challenge is a single enum value, and finally
//! migrated into a [`portico_acme::AcmeConfiguration`] by
//! [`LegacyAcme::migrate`].
//!
//! ```toml
//! [acme]
//! email = "admin@example.com"
//! storage = "/var/lib/portico/acme.json"
//! entryPoint = "https"
//!
//! [acme.dnsChallenge]
//! provider = "route53"
//! delayBeforeCheck = 30
//!
//! [[acme.domains]]
//! main = "example.com"
//! sans = ["www.example.com"]
//! ```

mod challenge;
mod convert;

use portico_acme::AcmeConfiguration;
use portico_common::Domain;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ca_server::safe_ca_server;

/// ACME block as written in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcmeBlock {
    pub email: String,
    pub domains: Vec<Domain>,
    /// Certificate store location
    pub storage: String,
    /// Deprecated, has no effect
    pub on_demand: bool,
    pub on_host_rule: bool,
    pub ca_server: String,
    /// Entry point the certificates are attached to
    pub entry_point: String,
    /// Key algorithm name, checked when the block is converted
    pub key_type: String,
    #[serde(rename = "acmeLogging")]
    pub acme_logging: bool,
    pub http_challenge: Option<HttpChallengeBlock>,
    pub dns_challenge: Option<DnsChallengeBlock>,
    pub tls_challenge: Option<TlsChallengeBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpChallengeBlock {
    pub entry_point: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DnsChallengeBlock {
    pub provider: String,
    /// Seconds to wait before checking DNS propagation
    pub delay_before_check: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsChallengeBlock {}

impl AcmeBlock {
    /// Normalize the CA server, settle the challenge type and report
    /// deprecated settings. Safe to call more than once.
    pub fn normalize(&mut self) {
        self.ca_server = safe_ca_server(&self.ca_server);
        self.resolve_challenges();

        if self.on_demand {
            warn!("ACME.OnDemand is deprecated");
        }
    }
}

/// The single challenge left after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AcmeChallenge {
    Http(HttpChallengeBlock),
    Dns(DnsChallengeBlock),
    Tls(TlsChallengeBlock),
}

/// Effective legacy ACME settings, waiting to be migrated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAcme {
    pub email: String,
    pub domains: Vec<Domain>,
    pub storage: String,
    pub on_demand: bool,
    pub on_host_rule: bool,
    pub ca_server: String,
    pub entry_point: String,
    pub key_type: String,
    pub acme_logging: bool,
    pub challenge: Option<AcmeChallenge>,
}

impl From<AcmeBlock> for LegacyAcme {
    fn from(mut block: AcmeBlock) -> Self {
        block.resolve_challenges();

        let challenge = match (block.dns_challenge, block.tls_challenge, block.http_challenge) {
            (Some(dns), _, _) => Some(AcmeChallenge::Dns(dns)),
            (None, Some(tls), _) => Some(AcmeChallenge::Tls(tls)),
            (None, None, Some(http)) => Some(AcmeChallenge::Http(http)),
            (None, None, None) => None,
        };

        Self {
            email: block.email,
            domains: block.domains,
            storage: block.storage,
            on_demand: block.on_demand,
            on_host_rule: block.on_host_rule,
            ca_server: block.ca_server,
            entry_point: block.entry_point,
            key_type: block.key_type,
            acme_logging: block.acme_logging,
            challenge,
        }
    }
}

/// Outcome of [`LegacyAcme::migrate`]
#[derive(Debug, Clone, PartialEq)]
pub enum AcmeMigration {
    /// No storage location; the block is dropped
    MissingStorage,
    /// Legacy cluster mode owns the block; nothing was converted
    Retained(LegacyAcme),
    /// Converted into the current shape
    Converted(AcmeConfiguration),
}

impl LegacyAcme {
    /// Consume the legacy block.
    ///
    /// The storage check comes first, so an unusable block is dropped even
    /// in cluster mode.
    pub fn migrate(self, cluster_mode: bool) -> AcmeMigration {
        if self.storage.is_empty() {
            return AcmeMigration::MissingStorage;
        }
        if cluster_mode {
            return AcmeMigration::Retained(self);
        }
        AcmeMigration::Converted(self.to_configuration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn block_with_storage(storage: &str) -> AcmeBlock {
        AcmeBlock {
            email: "admin@example.com".to_string(),
            storage: storage.to_string(),
            entry_point: "https".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_sets_default_ca_server() {
        let mut block = block_with_storage("acme.json");
        block.normalize();
        assert_eq!(block.ca_server, crate::DEFAULT_ACME_CA_SERVER);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut block = block_with_storage("acme.json");
        block.ca_server = "https://acme-v01.api.letsencrypt.org/directory".to_string();
        block.http_challenge = Some(HttpChallengeBlock::default());
        block.tls_challenge = Some(TlsChallengeBlock {});
        block.on_demand = true;

        block.normalize();
        let once = block.clone();
        block.normalize();
        assert_eq!(block, once);
    }

    #[traced_test]
    #[test]
    fn test_on_demand_is_reported() {
        let mut block = block_with_storage("acme.json");
        block.normalize();
        assert!(!logs_contain("ACME.OnDemand is deprecated"));

        block.on_demand = true;
        block.normalize();
        assert!(logs_contain("ACME.OnDemand is deprecated"));
        assert!(block.on_demand);
    }

    #[test]
    fn test_collapse_into_single_challenge() {
        let mut block = block_with_storage("acme.json");
        block.dns_challenge = Some(DnsChallengeBlock {
            provider: "route53".to_string(),
            delay_before_check: 10,
        });
        block.http_challenge = Some(HttpChallengeBlock {
            entry_point: "http".to_string(),
        });

        let legacy = LegacyAcme::from(block);
        assert_eq!(
            legacy.challenge,
            Some(AcmeChallenge::Dns(DnsChallengeBlock {
                provider: "route53".to_string(),
                delay_before_check: 10,
            }))
        );
    }

    #[test]
    fn test_collapse_without_challenge() {
        let legacy = LegacyAcme::from(block_with_storage("acme.json"));
        assert!(legacy.challenge.is_none());
    }

    #[test]
    fn test_migrate_missing_storage() {
        let legacy = LegacyAcme::from(block_with_storage(""));
        assert_eq!(legacy.clone().migrate(false), AcmeMigration::MissingStorage);
        assert_eq!(legacy.migrate(true), AcmeMigration::MissingStorage);
    }

    #[test]
    fn test_migrate_cluster_mode_retains() {
        let legacy = LegacyAcme::from(block_with_storage("acme.json"));
        assert_eq!(
            legacy.clone().migrate(true),
            AcmeMigration::Retained(legacy)
        );
    }

    #[test]
    fn test_migrate_converts() {
        let legacy = LegacyAcme::from(block_with_storage("acme.json"));
        match legacy.migrate(false) {
            AcmeMigration::Converted(configuration) => {
                assert_eq!(configuration.storage, "acme.json");
                assert_eq!(configuration.email, "admin@example.com");
            }
            other => panic!("expected conversion, got {:?}", other),
        }
    }
}
