//! Origin binding and relying-party checks for Sign-In with Ethereum.
//!
//! This crate provides:
//! - [`OriginVerifier`]: the wallet-side decision whether a message's
//!   `scheme` and `domain` agree with the origin actually asking for a signature
//! - [`VerifierConfig`]: policy loaded from TOML
//! - [`verify_sign_in`]: the relying-party side check of a signed message
//!
//! Core invariants:
//! - Verification is pure, synchronous and deterministic
//! - Checks run in a fixed order of decreasing severity; a rejection stops the run
//! - Developer mode turns rejections into warnings for the scheme, host and
//!   subdomain checks only; the scheme allow-list is never relaxed
//!
#![deny(missing_docs)]

/// Verifier policy configuration.
pub mod config;
/// Per-call verification context and subdomain policy.
pub mod context;
/// Error types.
pub mod errors;
/// Request origins.
pub mod origin;
/// Relying-party verification of signed messages.
pub mod sign_in;
/// Origin verification checks and outcomes.
pub mod verification;

pub use config::{DeveloperMode, VerifierConfig};
pub use context::{SubdomainPolicy, VerificationContext};
pub use errors::{ConfigError, OriginError, SignInError, SignatureCheckError};
pub use origin::{default_port, Origin};
pub use sign_in::{verify_sign_in, SignInExpectations, SignatureCheck};
pub use verification::{Check, Decision, Finding, OriginVerifier, Severity, VerificationOutcome};
