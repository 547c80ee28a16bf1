use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::origin::Origin;

/// Scheme accepted when nothing else is configured.
pub const DEFAULT_SCHEME: &str = "https";

/// When two differing hosts count as a subdomain mismatch worth a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubdomainPolicy {
    /// One host is a dot-suffix of the other (`www.example.com` vs `example.com`).
    #[default]
    StrictSuffix,
    /// As `StrictSuffix`, plus siblings under the same parent domain
    /// (`a.example.com` vs `b.example.com`).
    SharedParent,
    /// Never flag.
    Disabled,
}

impl SubdomainPolicy {
    /// True if the hosts differ in a way this policy reports.
    pub fn flags(&self, message_host: &str, origin_host: &str) -> bool {
        let a = message_host.to_ascii_lowercase();
        let b = origin_host.to_ascii_lowercase();
        if a == b {
            return false;
        }
        match self {
            SubdomainPolicy::Disabled => false,
            SubdomainPolicy::StrictSuffix => is_strict_subdomain(&a, &b),
            SubdomainPolicy::SharedParent => {
                is_strict_subdomain(&a, &b)
                    || matches!((parent(&a), parent(&b)), (Some(x), Some(y)) if x == y)
            }
        }
    }
}

fn is_strict_subdomain(a: &str, b: &str) -> bool {
    a.ends_with(&format!(".{b}")) || b.ends_with(&format!(".{a}"))
}

/// Parent domain with at least two labels, so siblings under a bare TLD do not match.
fn parent(host: &str) -> Option<&str> {
    host.split_once('.')
        .map(|(_, rest)| rest)
        .filter(|rest| rest.contains('.'))
}

/// Inputs of one origin verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationContext {
    /// Origin the signing request actually came from.
    pub origin: Origin,
    /// Schemes a message may use.
    pub allowed_schemes: BTreeSet<String>,
    /// Scheme assumed when the message states none.
    pub default_scheme: String,
    /// Relaxes scheme, host and subdomain rejections to warnings.
    pub developer_mode: bool,
    /// Predicate for the subdomain advisory check.
    pub subdomain_policy: SubdomainPolicy,
}

impl VerificationContext {
    /// Context with the recommended defaults: only `https`, developer mode off.
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            allowed_schemes: BTreeSet::from([DEFAULT_SCHEME.to_string()]),
            default_scheme: DEFAULT_SCHEME.to_string(),
            developer_mode: false,
            subdomain_policy: SubdomainPolicy::default(),
        }
    }

    /// Sets developer mode.
    pub fn with_developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode = enabled;
        self
    }

    /// Adds a scheme to the allow-list.
    pub fn allow_scheme(mut self, scheme: &str) -> Self {
        self.allowed_schemes.insert(scheme.to_ascii_lowercase());
        self
    }

    /// Sets the subdomain policy.
    pub fn with_subdomain_policy(mut self, policy: SubdomainPolicy) -> Self {
        self.subdomain_policy = policy;
        self
    }

    /// True if `scheme` is on the allow-list, ignoring case.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.allowed_schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}
