use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use siwe_codec::{Domain, Scheme};

use crate::errors::OriginError;

/// Conventional port for a scheme, if it has one.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "https" | "wss" => Some(443),
        "http" | "ws" => Some(80),
        _ => None,
    }
}

/// Scheme, host and port of the party actually requesting a signature.
///
/// Scheme and host are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// URI scheme.
    pub scheme: String,
    /// Host, brackets included for IPv6 literals.
    pub host: String,
    /// Explicit port, if the origin carries one.
    pub port: Option<u16>,
}

impl Origin {
    /// Creates an origin from its parts.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into().to_ascii_lowercase(),
            port,
        }
    }

    /// Parses `scheme://authority`, ignoring any path, query or fragment.
    pub fn parse(value: &str) -> Result<Self, OriginError> {
        let (scheme, rest) = value
            .split_once("://")
            .ok_or_else(|| OriginError::MissingScheme(value.to_string()))?;
        let scheme = Scheme::parse(scheme).map_err(OriginError::InvalidScheme)?;
        let authority = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let domain = Domain::parse(authority).map_err(OriginError::InvalidAuthority)?;
        Ok(Self::new(scheme.as_str(), domain.host(), domain.port()))
    }

    /// Explicit port, or the scheme's default.
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    /// True if the origin carries a port other than its scheme's default.
    pub fn has_non_default_port(&self) -> bool {
        self.port.is_some_and(|port| Some(port) != default_port(&self.scheme))
    }

    /// True for `localhost`, `*.localhost` and loopback IP addresses.
    pub fn is_loopback(&self) -> bool {
        if self.host == "localhost" || self.host.ends_with(".localhost") {
            return true;
        }
        let bare = self.host.trim_start_matches('[').trim_end_matches(']');
        bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
