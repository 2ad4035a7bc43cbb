//! Server-wide settings: life cycle, timeouts, retries, health checks,
//! host resolution and the legacy cluster block.
//!
//! Durations are whole seconds. A zero value means "not set"; the accessors
//! fall back to the documented defaults where one exists.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default periodicity of enabled health checks
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Default request timeout of enabled health checks
pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout when connecting to a backend server
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default idle time before closing a keep-alive connection
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(180);

/// Default time given to pending requests during shutdown
pub const DEFAULT_GRACE_TIMEOUT: Duration = Duration::from_secs(10);

fn secs_or(value: u64, fallback: Duration) -> Duration {
    if value == 0 {
        fallback
    } else {
        Duration::from_secs(value)
    }
}

/// Shutdown behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifeCycle {
    /// Keep accepting requests this long before starting graceful shutdown
    #[serde(rename = "requestAcceptGraceTimeout")]
    pub request_accept_grace_timeout_secs: u64,
    /// Give active requests this long to finish
    #[serde(rename = "graceTimeOut")]
    pub grace_timeout_secs: u64,
}

impl LifeCycle {
    pub fn request_accept_grace_timeout(&self) -> Duration {
        Duration::from_secs(self.request_accept_grace_timeout_secs)
    }

    pub fn grace_timeout(&self) -> Duration {
        secs_or(self.grace_timeout_secs, DEFAULT_GRACE_TIMEOUT)
    }
}

/// Retry requests on network errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Retry {
    /// Zero means one attempt per backend server
    pub attempts: u32,
}

/// Defaults for backend health checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HealthCheckConfig {
    #[serde(rename = "interval")]
    pub interval_secs: u64,
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        secs_or(self.interval_secs, DEFAULT_HEALTH_CHECK_INTERVAL)
    }

    pub fn timeout(&self) -> Duration {
        secs_or(self.timeout_secs, DEFAULT_HEALTH_CHECK_TIMEOUT)
    }
}

/// Timeouts for requests received by the proxy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RespondingTimeouts {
    #[serde(rename = "readTimeout")]
    pub read_timeout_secs: u64,
    #[serde(rename = "writeTimeout")]
    pub write_timeout_secs: u64,
    #[serde(rename = "idleTimeout")]
    pub idle_timeout_secs: u64,
}

impl RespondingTimeouts {
    pub fn idle_timeout(&self) -> Duration {
        secs_or(self.idle_timeout_secs, DEFAULT_IDLE_TIMEOUT)
    }
}

/// Timeouts for requests forwarded to backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardingTimeouts {
    #[serde(rename = "dialTimeout")]
    pub dial_timeout_secs: u64,
    #[serde(rename = "responseHeaderTimeout")]
    pub response_header_timeout_secs: u64,
}

impl ForwardingTimeouts {
    pub fn dial_timeout(&self) -> Duration {
        secs_or(self.dial_timeout_secs, DEFAULT_DIAL_TIMEOUT)
    }
}

/// CNAME flattening
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostResolverConfig {
    pub cname_flattening: bool,
    /// resolv.conf used for DNS resolution
    pub resolv_config: String,
    /// Maximal depth of recursive resolution
    pub resolv_depth: u32,
}

fn default_resolv_config() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_resolv_depth() -> u32 {
    5
}

impl Default for HostResolverConfig {
    fn default() -> Self {
        Self {
            cname_flattening: false,
            resolv_config: default_resolv_config(),
            resolv_depth: default_resolv_depth(),
        }
    }
}

/// Legacy cluster mode
///
/// When present, the legacy ACME block is left for the cluster code path
/// instead of being migrated to the local provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Node identifier
    pub node: String,
    pub store: Option<ClusterStore>,
}

/// Key-value store backing the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterStore {
    pub prefix: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_durations_fall_back() {
        assert_eq!(LifeCycle::default().grace_timeout(), DEFAULT_GRACE_TIMEOUT);
        assert_eq!(LifeCycle::default().request_accept_grace_timeout(), Duration::ZERO);
        assert_eq!(HealthCheckConfig::default().interval(), DEFAULT_HEALTH_CHECK_INTERVAL);
        assert_eq!(HealthCheckConfig::default().timeout(), DEFAULT_HEALTH_CHECK_TIMEOUT);
        assert_eq!(RespondingTimeouts::default().idle_timeout(), DEFAULT_IDLE_TIMEOUT);
        assert_eq!(ForwardingTimeouts::default().dial_timeout(), DEFAULT_DIAL_TIMEOUT);
    }

    #[test]
    fn test_explicit_durations_win() {
        let life_cycle = LifeCycle {
            grace_timeout_secs: 3,
            ..Default::default()
        };
        assert_eq!(life_cycle.grace_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_host_resolver_defaults() {
        let resolver = HostResolverConfig::default();
        assert_eq!(resolver.resolv_config, "/etc/resolv.conf");
        assert_eq!(resolver.resolv_depth, 5);
        assert!(!resolver.cname_flattening);
    }
}
