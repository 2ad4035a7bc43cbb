//! Portico Common
//!
//! Types shared between the configuration pipeline (`portico-config`) and
//! the certificate automation crate (`portico-acme`).
//!
//! - [`Domain`]: a certificate subject (main name plus subject alternative names)
//! - [`KeyType`]: the private key algorithm requested from the CA

pub mod types;

pub use types::{un_fqdn, Domain, KeyType};
