//! ACME provider handed to the certificate-automation runtime.

use portico_common::Domain;
use tracing::debug;

use crate::config::AcmeConfiguration;
use crate::store::LocalStore;

/// A current-shape ACME configuration bound to its certificate store.
#[derive(Debug, Clone)]
pub struct AcmeProvider {
    configuration: AcmeConfiguration,
    store: LocalStore,
}

impl AcmeProvider {
    /// Bind `configuration` to a [`LocalStore`] at `configuration.storage`.
    pub fn new(configuration: AcmeConfiguration) -> Self {
        let store = LocalStore::new(&configuration.storage);
        debug!(
            storage = %configuration.storage,
            entry_point = %configuration.entry_point,
            domains = configuration.domains.len(),
            "Created ACME provider"
        );
        Self {
            configuration,
            store,
        }
    }

    pub fn configuration(&self) -> &AcmeConfiguration {
        &self.configuration
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn domains(&self) -> &[Domain] {
        &self.configuration.domains
    }

    pub fn entry_point(&self) -> &str {
        &self.configuration.entry_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_provider_binds_store_to_storage() {
        let provider = AcmeProvider::new(AcmeConfiguration {
            storage: "/var/lib/portico/acme.json".to_string(),
            entry_point: "https".to_string(),
            domains: vec![Domain::new("example.com")],
            ..Default::default()
        });

        assert_eq!(provider.store().path(), Path::new("/var/lib/portico/acme.json"));
        assert_eq!(provider.entry_point(), "https");
        assert_eq!(provider.domains().len(), 1);
    }
}
