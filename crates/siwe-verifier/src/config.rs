use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use siwe_codec::Scheme;

use crate::context::{SubdomainPolicy, VerificationContext, DEFAULT_SCHEME};
use crate::errors::ConfigError;
use crate::origin::Origin;

/// When developer mode is in effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeveloperMode {
    /// Never.
    #[default]
    Off,
    /// Always.
    On,
    /// Only when the requesting origin is a loopback host.
    Loopback,
}

/// Verifier policy.
///
/// # Config File Format
///
/// ```toml
/// allowed_schemes = ["https", "http"]
/// default_scheme = "https"
/// developer_mode = "loopback"
/// subdomain_policy = "strict-suffix"
/// max_message_bytes = 8192
/// ```
///
/// Every key is optional; missing keys take the recommended defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Schemes a message may use. Anything beyond `https` only applies in developer mode.
    pub allowed_schemes: Vec<String>,
    /// Scheme assumed when a message states none.
    pub default_scheme: String,
    /// Developer mode setting.
    pub developer_mode: DeveloperMode,
    /// Subdomain advisory policy.
    pub subdomain_policy: SubdomainPolicy,
    /// Upper bound on message text size accepted by callers of this config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message_bytes: Option<usize>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: vec![DEFAULT_SCHEME.to_string()],
            default_scheme: DEFAULT_SCHEME.to_string(),
            developer_mode: DeveloperMode::Off,
            subdomain_policy: SubdomainPolicy::default(),
            max_message_bytes: None,
        }
    }
}

impl VerifierConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that scheme names are well formed and the allow-list is not empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_schemes.is_empty() {
            return Err(ConfigError::Invalid("allowed_schemes is empty".into()));
        }
        for scheme in self.allowed_schemes.iter().chain([&self.default_scheme]) {
            Scheme::parse(scheme.as_str())
                .map_err(|e| ConfigError::Invalid(format!("bad scheme: {}", e)))?;
        }
        if self.max_message_bytes == Some(0) {
            return Err(ConfigError::Invalid("max_message_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Whether developer mode applies to requests from `origin`.
    pub fn developer_mode_for(&self, origin: &Origin) -> bool {
        match self.developer_mode {
            DeveloperMode::Off => false,
            DeveloperMode::On => true,
            DeveloperMode::Loopback => origin.is_loopback(),
        }
    }

    /// Builds the verification context for one request.
    ///
    /// Outside developer mode the allow-list is narrowed to `https`.
    pub fn context_for(&self, origin: Origin) -> VerificationContext {
        let developer_mode = self.developer_mode_for(&origin);
        let mut allowed: BTreeSet<String> = self
            .allowed_schemes
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if !developer_mode {
            let dropped: Vec<String> = allowed
                .iter()
                .filter(|s| s.as_str() != DEFAULT_SCHEME)
                .cloned()
                .collect();
            if !dropped.is_empty() {
                tracing::warn!(
                    origin = %origin,
                    dropped = ?dropped,
                    "schemes other than https are only allowed in developer mode"
                );
                allowed.retain(|s| s == DEFAULT_SCHEME);
            }
        }
        VerificationContext {
            origin,
            allowed_schemes: allowed,
            default_scheme: self.default_scheme.to_ascii_lowercase(),
            developer_mode,
            subdomain_policy: self.subdomain_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_recommended_defaults() {
        let config = VerifierConfig::from_toml_str("").unwrap();
        assert_eq!(config, VerifierConfig::default());
        assert_eq!(config.allowed_schemes, vec!["https".to_string()]);
    }

    #[test]
    fn parses_all_keys() {
        let config = VerifierConfig::from_toml_str(
            r#"
            allowed_schemes = ["https", "http"]
            default_scheme = "https"
            developer_mode = "loopback"
            subdomain_policy = "shared-parent"
            max_message_bytes = 4096
            "#,
        )
        .unwrap();
        assert_eq!(config.developer_mode, DeveloperMode::Loopback);
        assert_eq!(config.subdomain_policy, SubdomainPolicy::SharedParent);
        assert_eq!(config.max_message_bytes, Some(4096));
    }

    #[test]
    fn rejects_unknown_keys_and_bad_schemes() {
        assert!(matches!(
            VerifierConfig::from_toml_str("allowed = [\"https\"]"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            VerifierConfig::from_toml_str("allowed_schemes = [\"1nvalid\"]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            VerifierConfig::from_toml_str("allowed_schemes = []"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn loopback_mode_follows_origin() {
        let config = VerifierConfig {
            allowed_schemes: vec!["https".into(), "http".into()],
            developer_mode: DeveloperMode::Loopback,
            ..VerifierConfig::default()
        };

        let local = config.context_for(Origin::parse("http://localhost:3000").unwrap());
        assert!(local.developer_mode);
        assert!(local.allows_scheme("http"));

        let remote = config.context_for(Origin::parse("https://example.com").unwrap());
        assert!(!remote.developer_mode);
        assert!(!remote.allows_scheme("http"));
        assert!(remote.allows_scheme("https"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "developer_mode = \"on\"").unwrap();
        let config = VerifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.developer_mode, DeveloperMode::On);

        assert!(matches!(
            VerifierConfig::from_file("/nonexistent/siwe.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
