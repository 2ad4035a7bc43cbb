//! ACME certificate automation: current configuration shape
//!
//! This crate holds what the certificate-automation runtime consumes once the
//! startup pipeline has migrated the legacy ACME block:
//!
//! - [`AcmeConfiguration`] - the current-shape configuration
//! - [`AcmeProvider`] - configuration bound to its [`LocalStore`]
//! - [`LocalStore`] - JSON file holding the ACME account and issued certificates
//! - [`convert_to_new_format`] - one-time upgrade of a legacy store file
//!
//! The ACME protocol client itself lives elsewhere; nothing here talks to a CA.
//!
//! # Store layout
//!
//! ```json
//! {
//!   "Account": { "Email": "admin@example.com", "KeyType": "RSA4096", ... },
//!   "Certificates": [
//!     { "Domain": { "main": "example.com", "sans": [] }, "Certificate": "<base64>", "Key": "<base64>" }
//!   ]
//! }
//! ```

mod config;
mod error;
mod migrate;
mod provider;
mod store;

pub use config::{AcmeConfiguration, Challenge, DnsChallenge, HttpChallenge, TlsChallenge};
pub use error::StoreError;
pub use migrate::{convert_to_new_format, FormatUpgrade};
pub use provider::AcmeProvider;
pub use store::{Account, LocalStore, StoredCertificate, StoredData};
