use siwe_codec::{ParseError, ValidationError};
use thiserror::Error;

/// Errors parsing a request origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OriginError {
    /// The origin lacks a `scheme://` prefix.
    #[error("origin {0:?} has no scheme")]
    MissingScheme(String),
    /// The scheme is not a valid URI scheme.
    #[error("invalid origin scheme: {0}")]
    InvalidScheme(#[source] ValidationError),
    /// The authority is not a valid host and port.
    #[error("invalid origin authority: {0}")]
    InvalidAuthority(#[source] ValidationError),
}

/// Errors loading verifier configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration parsed but violates a constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure reported by an external signature checker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("signature check failed: {0}")]
pub struct SignatureCheckError(pub String);

/// Reasons a relying party refuses a signed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignInError {
    /// The message text does not parse.
    #[error("message does not parse: {0}")]
    Parse(#[from] ParseError),
    /// The message scheme differs from the expected one.
    #[error("scheme mismatch: expected {expected}, found {found}")]
    SchemeMismatch {
        /// Expected scheme.
        expected: String,
        /// Scheme in the message (absent counts as `https`).
        found: String,
    },
    /// The message domain differs from the expected one.
    #[error("domain mismatch: expected {expected}, found {found}")]
    DomainMismatch {
        /// Expected domain.
        expected: String,
        /// Domain in the message.
        found: String,
    },
    /// The message nonce differs from the one issued for this session.
    #[error("nonce mismatch: expected {expected}, found {found}")]
    NonceMismatch {
        /// Issued nonce.
        expected: String,
        /// Nonce in the message.
        found: String,
    },
    /// The verification time is before `Not Before`.
    #[error("message is not valid before {0}")]
    NotYetValid(String),
    /// The verification time is at or after `Expiration Time`.
    #[error("message expired at {0}")]
    Expired(String),
    /// The signature does not belong to the message address.
    #[error("signature is not valid for {0}")]
    InvalidSignature(String),
    /// The signature checker itself failed.
    #[error(transparent)]
    SignatureCheck(#[from] SignatureCheckError),
}
