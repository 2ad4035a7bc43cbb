//! Challenge exclusivity.
//!
//! DNS wins over both HTTP and TLS; between HTTP and TLS, TLS wins. The
//! checks run pairwise in that order.

use tracing::warn;

use super::AcmeBlock;

impl AcmeBlock {
    /// Drop conflicting challenges so at most one remains.
    pub fn resolve_challenges(&mut self) {
        if self.dns_challenge.is_some() && self.http_challenge.is_some() {
            warn!("Unable to use DNS challenge and HTTP challenge at the same time. Fallback to DNS challenge.");
            self.http_challenge = None;
        }

        if self.dns_challenge.is_some() && self.tls_challenge.is_some() {
            warn!("Unable to use DNS challenge and TLS challenge at the same time. Fallback to DNS challenge.");
            self.tls_challenge = None;
        }

        if self.http_challenge.is_some() && self.tls_challenge.is_some() {
            warn!("Unable to use HTTP challenge and TLS challenge at the same time. Fallback to TLS challenge.");
            self.http_challenge = None;
        }
    }

    /// Number of challenge blocks currently set
    pub fn challenge_count(&self) -> usize {
        usize::from(self.http_challenge.is_some())
            + usize::from(self.dns_challenge.is_some())
            + usize::from(self.tls_challenge.is_some())
    }
}
