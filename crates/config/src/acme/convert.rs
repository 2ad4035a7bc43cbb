//! Legacy ACME block to current ACME configuration.

use portico_acme::{AcmeConfiguration, Challenge, DnsChallenge, HttpChallenge, TlsChallenge};
use portico_common::KeyType;
use tracing::warn;

use super::{AcmeChallenge, LegacyAcme};

impl LegacyAcme {
    /// Build the current-shape configuration.
    ///
    /// Domain names ending with a dot are reported but copied as is.
    pub fn to_configuration(&self) -> AcmeConfiguration {
        for domain in &self.domains {
            for name in domain.fqdn_names() {
                warn!(domain = %name, "FQDN detected, please remove the trailing dot: {}", name);
            }
        }

        let challenge = self.challenge.as_ref().map(|challenge| match challenge {
            AcmeChallenge::Http(http) => Challenge::Http(HttpChallenge {
                entry_point: http.entry_point.clone(),
            }),
            AcmeChallenge::Dns(dns) => Challenge::Dns(DnsChallenge {
                provider: dns.provider.clone(),
                delay_before_check: dns.delay_before_check,
            }),
            AcmeChallenge::Tls(_) => Challenge::Tls(TlsChallenge {}),
        });

        AcmeConfiguration {
            email: self.email.clone(),
            acme_logging: self.acme_logging,
            ca_server: self.ca_server.clone(),
            storage: self.storage.clone(),
            entry_point: self.entry_point.clone(),
            key_type: resolve_key_type(&self.key_type),
            on_host_rule: self.on_host_rule,
            domains: self.domains.clone(),
            challenge,
        }
    }
}

/// Map a configured key type name; empty selects the default quietly.
fn resolve_key_type(name: &str) -> KeyType {
    name.parse().unwrap_or_else(|_| {
        let fallback = KeyType::default();
        warn!("Unknown key type {:?}, using {}", name, fallback);
        fallback
    })
}
