//! Current-shape ACME configuration.

use portico_common::{Domain, KeyType};
use serde::{Deserialize, Serialize};

/// ACME configuration as consumed by the certificate-automation runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AcmeConfiguration {
    /// Contact email registered with the CA
    pub email: String,
    /// Log ACME protocol exchanges
    pub acme_logging: bool,
    /// CA directory URL
    pub ca_server: String,
    /// Location of the certificate store
    pub storage: String,
    /// Entry point the certificates are attached to
    pub entry_point: String,
    /// Private key algorithm
    pub key_type: KeyType,
    /// Request certificates for hosts found in frontend rules
    pub on_host_rule: bool,
    /// Statically requested certificates
    pub domains: Vec<Domain>,
    /// Proof-of-control method, if one was configured
    pub challenge: Option<Challenge>,
}

impl AcmeConfiguration {
    pub fn http_challenge(&self) -> Option<&HttpChallenge> {
        match &self.challenge {
            Some(Challenge::Http(http)) => Some(http),
            _ => None,
        }
    }

    pub fn dns_challenge(&self) -> Option<&DnsChallenge> {
        match &self.challenge {
            Some(Challenge::Dns(dns)) => Some(dns),
            _ => None,
        }
    }

    pub fn tls_challenge(&self) -> Option<&TlsChallenge> {
        match &self.challenge {
            Some(Challenge::Tls(tls)) => Some(tls),
            _ => None,
        }
    }
}

/// The single active challenge type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Challenge {
    Http(HttpChallenge),
    Dns(DnsChallenge),
    Tls(TlsChallenge),
}

impl Challenge {
    pub fn name(&self) -> &'static str {
        match self {
            Challenge::Http(_) => "http-01",
            Challenge::Dns(_) => "dns-01",
            Challenge::Tls(_) => "tls-alpn-01",
        }
    }
}

/// HTTP-01: the CA fetches a token from the given entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpChallenge {
    pub entry_point: String,
}

/// DNS-01: a TXT record is published through a DNS provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DnsChallenge {
    /// DNS provider identifier (e.g. "route53")
    pub provider: String,
    /// Seconds to wait before checking propagation
    pub delay_before_check: u64,
}

/// TLS-ALPN-01: only its presence matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsChallenge {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_accessors() {
        let config = AcmeConfiguration {
            challenge: Some(Challenge::Dns(DnsChallenge {
                provider: "route53".to_string(),
                delay_before_check: 30,
            })),
            ..Default::default()
        };

        assert_eq!(config.dns_challenge().unwrap().provider, "route53");
        assert!(config.http_challenge().is_none());
        assert!(config.tls_challenge().is_none());
        assert_eq!(config.challenge.as_ref().unwrap().name(), "dns-01");
    }

    #[test]
    fn test_no_challenge() {
        let config = AcmeConfiguration::default();
        assert!(config.http_challenge().is_none());
        assert!(config.dns_challenge().is_none());
        assert!(config.tls_challenge().is_none());
    }
}
