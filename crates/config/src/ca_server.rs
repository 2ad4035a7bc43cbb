//! CA server URL normalization.
//!
//! The ACME v01 endpoints were retired; configurations that still point at
//! them are rewritten to the matching v02 endpoint.

use tracing::warn;

/// Default ACME directory (Let's Encrypt production, v02)
pub const DEFAULT_ACME_CA_SERVER: &str = "https://acme-v02.api.letsencrypt.org/directory";

const V01_PRODUCTION_PREFIX: &str = "https://acme-v01.api.letsencrypt.org";
const V01_STAGING_PREFIX: &str = "https://acme-staging.api.letsencrypt.org";
const V02_STAGING_PREFIX: &str = "https://acme-staging-v02.api.letsencrypt.org";

/// Return a usable CA server URL for `ca_server`.
///
/// Empty selects [`DEFAULT_ACME_CA_SERVER`]; retired v01 production and
/// staging URLs are rewritten to v02; anything else is returned unchanged.
pub fn safe_ca_server(ca_server: &str) -> String {
    if ca_server.is_empty() {
        return DEFAULT_ACME_CA_SERVER.to_string();
    }

    if ca_server.starts_with(V01_PRODUCTION_PREFIX) {
        let rewritten = ca_server.replacen("v01", "v02", 1);
        warn_v01(ca_server, &rewritten);
        return rewritten;
    }

    if ca_server.starts_with(V01_STAGING_PREFIX) {
        let rewritten = ca_server.replacen(V01_STAGING_PREFIX, V02_STAGING_PREFIX, 1);
        warn_v01(ca_server, &rewritten);
        return rewritten;
    }

    ca_server.to_string()
}

fn warn_v01(configured: &str, fallback: &str) {
    warn!(
        configured = %configured,
        fallback = %fallback,
        "The CA server {:?} refers to a v01 endpoint of the ACME API, please change to {:?}. Fallback to {:?}.",
        configured,
        fallback,
        fallback
    );
}
