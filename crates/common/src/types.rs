//! Certificate subject and key types.
//!
//! These appear in both the legacy ACME block and the current ACME
//! configuration, so they live here rather than in either crate.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strip a single trailing dot from a fully-qualified name.
///
/// `"example.com."` becomes `"example.com"`; anything else is returned as is.
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// A certificate subject: one main name and its alternative names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Domain {
    /// Main (common) name
    pub main: String,
    /// Subject alternative names, in declaration order
    pub sans: Vec<String>,
}

impl Domain {
    pub fn new(main: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            sans: Vec::new(),
        }
    }

    /// Add a subject alternative name
    pub fn with_san(mut self, san: impl Into<String>) -> Self {
        self.sans.push(san.into());
        self
    }

    /// All names covered by this domain, main first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.main.as_str()).chain(self.sans.iter().map(String::as_str))
    }

    /// Names that still carry a trailing fully-qualified dot
    pub fn fqdn_names(&self) -> impl Iterator<Item = &str> {
        self.names().filter(|name| un_fqdn(name) != *name)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sans.is_empty() {
            write!(f, "{}", self.main)
        } else {
            write!(f, "{} ({})", self.main, self.sans.join(", "))
        }
    }
}

/// Private key algorithm for issued certificates.
///
/// Deserialization goes through [`FromStr`], so an empty value in a
/// configuration file selects the default instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum KeyType {
    #[serde(rename = "EC256")]
    Ec256,
    #[serde(rename = "EC384")]
    Ec384,
    #[serde(rename = "RSA2048")]
    Rsa2048,
    #[default]
    #[serde(rename = "RSA4096")]
    Rsa4096,
    #[serde(rename = "RSA8192")]
    Rsa8192,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ec256 => "EC256",
            KeyType::Ec384 => "EC384",
            KeyType::Rsa2048 => "RSA2048",
            KeyType::Rsa4096 => "RSA4096",
            KeyType::Rsa8192 => "RSA8192",
        }
    }
}

impl FromStr for KeyType {
    type Err = String;

    /// Parse a key type name; an empty string selects the default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(KeyType::default()),
            "EC256" => Ok(KeyType::Ec256),
            "EC384" => Ok(KeyType::Ec384),
            "RSA2048" => Ok(KeyType::Rsa2048),
            "RSA4096" => Ok(KeyType::Rsa4096),
            "RSA8192" => Ok(KeyType::Rsa8192),
            other => Err(format!(
                "unknown key type '{}', expected one of EC256, EC384, RSA2048, RSA4096, RSA8192",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for KeyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_un_fqdn() {
        assert_eq!(un_fqdn("example.com."), "example.com");
        assert_eq!(un_fqdn("example.com"), "example.com");
        assert_eq!(un_fqdn(""), "");
        // Only one dot is removed
        assert_eq!(un_fqdn("example.com.."), "example.com.");
    }

    #[test]
    fn test_fqdn_names() {
        let domain = Domain::new("example.com.")
            .with_san("www.example.com")
            .with_san("api.example.com.");

        let flagged: Vec<_> = domain.fqdn_names().collect();
        assert_eq!(flagged, vec!["example.com.", "api.example.com."]);
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::new("a.com").to_string(), "a.com");
        assert_eq!(
            Domain::new("a.com").with_san("b.com").to_string(),
            "a.com (b.com)"
        );
    }

    #[test]
    fn test_key_type_serde_names() {
        let key: KeyType = serde_json::from_str("\"EC384\"").unwrap();
        assert_eq!(key, KeyType::Ec384);
        assert_eq!(serde_json::to_string(&KeyType::Rsa2048).unwrap(), "\"RSA2048\"");
        assert_eq!(KeyType::default(), KeyType::Rsa4096);

        let empty: KeyType = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty, KeyType::Rsa4096);
        assert!(serde_json::from_str::<KeyType>("\"DSA\"").is_err());
    }

    #[test]
    fn test_key_type_from_str() {
        assert_eq!("".parse::<KeyType>().unwrap(), KeyType::Rsa4096);
        assert_eq!("EC256".parse::<KeyType>().unwrap(), KeyType::Ec256);
        assert!("DSA".parse::<KeyType>().is_err());
    }

    proptest! {
        #[test]
        fn un_fqdn_never_leaves_more_than_input(name in "[a-z.]{0,20}") {
            let stripped = un_fqdn(&name);
            prop_assert!(name.starts_with(stripped));
            prop_assert!(name.len() - stripped.len() <= 1);
        }
    }
}
