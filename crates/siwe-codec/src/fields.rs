use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Minimum nonce length in characters.
pub const NONCE_MIN_LEN: usize = 8;
/// Length of nonces produced by [`Nonce::generate`].
pub const GENERATED_NONCE_LEN: usize = 17;

const AUTHORITY_PATTERN: &str = r"^(?:(?:[A-Za-z0-9\-._~!$&'()*+,;=:]|%[0-9A-Fa-f]{2})*@)?(?:\[[A-Za-z0-9:.\-_~!$&'()*+,;=]+\]|(?:[A-Za-z0-9\-._~!$&'()*+,;=]|%[0-9A-Fa-f]{2})+)(?::[0-9]*)?$";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex"))
}

macro_rules! text_impls {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

macro_rules! newtype {
    ($name:ident, $field:literal, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses a validated value from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                let s = value.into();
                if !compiled(&PATTERN, $pattern).is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: $field,
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the value as it appears in message text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        text_impls!($name);
    };
}

newtype!(
    Scheme,
    "scheme",
    "RFC 3986 URI scheme such as `https`.",
    r"^[A-Za-z][A-Za-z0-9+.\-]*$"
);
newtype!(
    Address,
    "address",
    "Account address: `0x` followed by 40 hex digits, in any casing.",
    r"^0x[0-9a-fA-F]{40}$"
);
newtype!(
    Uri,
    "uri",
    "RFC 3986 absolute URI.",
    r"^[A-Za-z][A-Za-z0-9+.\-]*:(?:[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]|%[0-9A-Fa-f]{2})*$"
);
newtype!(
    ChainId,
    "chain_id",
    "EIP-155 chain identifier as a decimal digit string.",
    r"^[0-9]+$"
);
newtype!(
    RequestId,
    "request_id",
    "Opaque request identifier made of RFC 3986 path characters.",
    r"^(?:[A-Za-z0-9\-._~!$&'()*+,;=:@]|%[0-9A-Fa-f]{2})*$"
);

impl Scheme {
    /// Returns the scheme lowercased, the form used for comparisons.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl ChainId {
    /// Returns the numeric chain id, or `None` if it does not fit in a `u64`.
    pub fn value(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// RFC 3986 authority (`[userinfo "@"] host [":" port]`) of the requesting site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Parses a validated authority.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let s = value.into();
        if !compiled(&PATTERN, AUTHORITY_PATTERN).is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "domain",
                value: s,
            });
        }
        let domain = Self(s);
        if let Some(port) = domain.port_text() {
            if port.parse::<u16>().is_err() {
                return Err(ValidationError::OutOfBounds {
                    field: "port",
                    value: port.to_string(),
                });
            }
        }
        Ok(domain)
    }

    /// Returns the authority as it appears in message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Userinfo component, if present.
    pub fn userinfo(&self) -> Option<&str> {
        self.0.split_once('@').map(|(userinfo, _)| userinfo)
    }

    /// Host component, including brackets for IP literals.
    pub fn host(&self) -> &str {
        self.split_host_port().0
    }

    /// Explicit port, if the authority carries a non-empty one.
    pub fn port(&self) -> Option<u16> {
        self.port_text().and_then(|p| p.parse().ok())
    }

    fn port_text(&self) -> Option<&str> {
        self.split_host_port().1.filter(|p| !p.is_empty())
    }

    fn split_host_port(&self) -> (&str, Option<&str>) {
        let host_port = match self.0.split_once('@') {
            Some((_, rest)) => rest,
            None => self.0.as_str(),
        };
        if host_port.starts_with('[') {
            return match host_port.find(']') {
                Some(end) => (
                    &host_port[..=end],
                    host_port[end + 1..].strip_prefix(':'),
                ),
                None => (host_port, None),
            };
        }
        match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    }
}

text_impls!(Domain);

/// Human-readable statement: a non-empty line of printable ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Statement(String);

impl Statement {
    /// Parses a validated statement.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "statement" });
        }
        if s.contains(['\n', '\r']) {
            return Err(ValidationError::LineBreak { field: "statement" });
        }
        if !s.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
            return Err(ValidationError::PatternMismatch {
                field: "statement",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Returns the statement text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

text_impls!(Statement);

/// Replay-protection token of at least eight ASCII alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce(String);

impl Nonce {
    /// Parses a validated nonce.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ValidationError::PatternMismatch {
                field: "nonce",
                value: s,
            });
        }
        if s.len() < NONCE_MIN_LEN {
            return Err(ValidationError::TooShort {
                field: "nonce",
                min: NONCE_MIN_LEN,
                actual: s.len(),
            });
        }
        Ok(Self(s))
    }

    /// Generates a fresh random alphanumeric nonce.
    pub fn generate() -> Self {
        let s = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_NONCE_LEN)
            .map(char::from)
            .collect();
        Self(s)
    }

    /// Returns the nonce text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

text_impls!(Nonce);

/// Message format version. Only version `1` exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// Version `1`.
    #[default]
    #[serde(rename = "1")]
    V1,
}

impl Version {
    /// Returns the version literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::V1 => "1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Version::V1),
            other => Err(ValidationError::Unsupported {
                field: "version",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_exposes_authority_parts() {
        let domain = Domain::parse("alice@login.example.com:8443").unwrap();
        assert_eq!(domain.userinfo(), Some("alice"));
        assert_eq!(domain.host(), "login.example.com");
        assert_eq!(domain.port(), Some(8443));

        let bare = Domain::parse("example.com").unwrap();
        assert_eq!(bare.userinfo(), None);
        assert_eq!(bare.host(), "example.com");
        assert_eq!(bare.port(), None);
    }

    #[test]
    fn domain_handles_ip_literals() {
        let domain = Domain::parse("[::1]:3000").unwrap();
        assert_eq!(domain.host(), "[::1]");
        assert_eq!(domain.port(), Some(3000));
    }

    #[test]
    fn domain_rejects_paths_and_large_ports() {
        assert!(Domain::parse("example.com/login").is_err());
        assert!(Domain::parse("").is_err());
        assert_eq!(
            Domain::parse("example.com:70000").unwrap_err(),
            ValidationError::OutOfBounds {
                field: "port",
                value: "70000".into()
            }
        );
    }

    #[test]
    fn uri_requires_scheme() {
        assert!(Uri::parse("https://example.com/login").is_ok());
        assert!(Uri::parse("ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq/").is_ok());
        assert!(Uri::parse("did:key:z6Mk").is_ok());
        assert!(Uri::parse("/relative/path").is_err());
        assert!(Uri::parse("https://example.com/a b").is_err());
    }

    #[test]
    fn nonce_rules() {
        assert_eq!(
            Nonce::parse("1234567").unwrap_err(),
            ValidationError::TooShort {
                field: "nonce",
                min: 8,
                actual: 7
            }
        );
        assert!(Nonce::parse("12345678").is_ok());
        assert!(matches!(
            Nonce::parse("1234-5678"),
            Err(ValidationError::PatternMismatch { field: "nonce", .. })
        ));
    }

    #[test]
    fn generated_nonces_are_valid_and_distinct() {
        let a = Nonce::generate();
        let b = Nonce::generate();
        assert_eq!(a.as_str().len(), GENERATED_NONCE_LEN);
        assert!(Nonce::parse(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn statement_rules() {
        assert_eq!(
            Statement::parse("line\nbreak").unwrap_err(),
            ValidationError::LineBreak { field: "statement" }
        );
        assert_eq!(
            Statement::parse("").unwrap_err(),
            ValidationError::Empty { field: "statement" }
        );
        assert!(Statement::parse("I accept the Terms of Service: https://example.com/tos").is_ok());
    }

    #[test]
    fn version_only_accepts_one() {
        assert_eq!("1".parse::<Version>().unwrap(), Version::V1);
        assert!("2".parse::<Version>().is_err());
    }

    #[test]
    fn chain_id_value() {
        assert_eq!(ChainId::parse("137").unwrap().value(), Some(137));
        assert!(ChainId::parse("0x1").is_err());
        assert!(ChainId::parse("").is_err());
    }
}
