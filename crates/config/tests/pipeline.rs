//! End-to-end startup pipeline: load, default, validate, migrate ACME, freeze.

use std::path::{Path, PathBuf};

use portico_acme::LocalStore;
use portico_config::{
    AcmeChallenge, ConfigError, GlobalConfig, TracingBackend, DEFAULT_INTERNAL_ENTRY_POINT,
};
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/portico.toml");

// "key" and "cert" in base64
const LEGACY_STORE: &str = r#"{
    "Email": "admin@example.com",
    "Registration": { "uri": "https://acme.example/acct/7" },
    "PrivateKey": "AQID",
    "DomainsCertificate": {
        "Certs": [
            {
                "Domains": { "Main": "example.com", "SANs": ["www.example.com"] },
                "Certificate": { "PrivateKey": "a2V5", "Certificate": "Y2VydA==" }
            }
        ]
    }
}"#;

/// Write the fixture with its storage pointing into `dir`
fn write_fixture(dir: &TempDir) -> (PathBuf, PathBuf) {
    let storage = dir.path().join("acme.json");
    let config_path = dir.path().join("portico.toml");
    let content = FIXTURE.replace("STORAGE_PATH", &storage.to_string_lossy());
    std::fs::write(&config_path, content).unwrap();
    (config_path, storage)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_full_pipeline_from_toml() {
    let dir = TempDir::new().unwrap();
    let (config_path, storage) = write_fixture(&dir);
    std::fs::write(&storage, LEGACY_STORE).unwrap();

    let global = GlobalConfig::from_file(&config_path).unwrap();
    let mut pending = global.into_pending(&path_str(&config_path));

    // Defaulting
    let internal = pending.entry_point(DEFAULT_INTERNAL_ENTRY_POINT).unwrap();
    assert_eq!(internal.address, ":8080");
    assert!(pending
        .entry_points
        .values()
        .all(|ep| ep.forwarded_headers.is_some()));
    assert!(pending.api.as_ref().unwrap().debug);
    assert_eq!(
        pending.file.as_ref().unwrap().static_config_file,
        path_str(&config_path)
    );
    let rancher_api = pending.rancher.as_ref().unwrap().api.as_ref().unwrap();
    assert_eq!(rancher_api.access_key, "A");
    assert_eq!(rancher_api.secret_key, "B");
    assert_eq!(rancher_api.endpoint, "E");

    // ACME normalization and challenge resolution
    let acme = pending.acme.as_ref().unwrap();
    assert_eq!(
        acme.ca_server,
        "https://acme-staging-v02.api.letsencrypt.org/directory"
    );
    assert!(matches!(acme.challenge, Some(AcmeChallenge::Tls(_))));

    // Tracing backend
    let tracing = pending.tracing.as_ref().unwrap();
    assert!(matches!(tracing.backend, TracingBackend::DataDog(_)));

    // Validation passes without warnings
    let result = pending.validate().unwrap();
    assert!(result.is_ok());
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    // ACME migration upgrades the legacy store
    let provider = pending.init_acme_provider().unwrap().unwrap();
    assert_eq!(provider.entry_point(), "https");
    assert!(provider.configuration().on_host_rule);
    assert!(provider.configuration().tls_challenge().is_some());
    assert!(pending.acme.is_none());

    let data = LocalStore::new(&storage).load().unwrap();
    assert_eq!(data.certificates.len(), 1);
    assert_eq!(data.certificates[0].domain.main, "example.com");
    assert_eq!(data.certificates[0].certificate, b"cert".to_vec());
    assert_eq!(data.account.unwrap().email, "admin@example.com");
    assert!(dir.path().join("acme.json.bak").exists());

    assert!(pending.init_acme_provider().unwrap().is_none());

    let frozen = pending.freeze();
    let dump = serde_json::to_value(&*frozen).unwrap();
    assert!(dump["entryPoints"]["https"]["tls"]["defaultCertificate"].is_object());
    assert!(dump["acme"].is_null());
}

#[test]
fn test_acme_on_plain_entry_point_is_fatal() {
    let global = GlobalConfig::from_json_str(
        r#"{
            "entryPoints": { "web": { "address": ":8000" } },
            "acme": { "storage": "acme.json", "entryPoint": "web" }
        }"#,
    )
    .unwrap();
    let pending = global.into_pending("portico.json");

    match pending.validate() {
        Err(ConfigError::Validation(result)) => {
            assert_eq!(result.errors.len(), 1);
            assert!(result.to_string().contains("has no TLS configuration"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_cluster_mode_leaves_acme_in_place() {
    let dir = TempDir::new().unwrap();
    let (config_path, storage) = write_fixture(&dir);

    let mut global = GlobalConfig::from_file(&config_path).unwrap();
    global.cluster = Some(Default::default());
    let mut pending = global.into_pending(&path_str(&config_path));

    assert!(pending.init_acme_provider().unwrap().is_none());
    assert!(pending.acme.is_some());
    assert!(!storage.exists());
}
