//! Relying-party verification of a signed message.
//!
//! Signature cryptography is out of scope here: EOA recovery and
//! contract-account validation live behind [`SignatureCheck`].

use chrono::{DateTime, Utc};
use siwe_codec::{Address, ChainId, Domain, Message, Nonce, Scheme};

use crate::context::DEFAULT_SCHEME;
use crate::errors::{SignInError, SignatureCheckError};

/// External signature verifier.
///
/// Implementations decide whether `signature` was produced by `address` over
/// `payload`, the exact message text. Applying the ERC-191 prefix, and
/// choosing between an EOA check and a contract-account check on `chain_id`,
/// is the implementation's job.
pub trait SignatureCheck {
    /// Returns whether the signature is valid.
    fn verify(
        &self,
        address: &Address,
        chain_id: &ChainId,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<bool, SignatureCheckError>;
}

/// What the relying party expects of a signed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInExpectations {
    /// Expected scheme; an absent message scheme counts as `https`.
    pub scheme: Option<Scheme>,
    /// Expected domain.
    pub domain: Option<Domain>,
    /// Nonce issued for this session.
    pub nonce: Option<Nonce>,
    /// Instant the validity window is checked against.
    pub at: DateTime<Utc>,
}

impl SignInExpectations {
    /// No field expectations, checked against the current time.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// No field expectations, checked against `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        Self {
            scheme: None,
            domain: None,
            nonce: None,
            at,
        }
    }

    /// Requires the given domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Requires the given nonce.
    pub fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Requires the given scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    fn check_fields(&self, message: &Message) -> Result<(), SignInError> {
        if let Some(expected) = &self.scheme {
            let found = message
                .scheme
                .as_ref()
                .map_or_else(|| DEFAULT_SCHEME.to_string(), Scheme::normalized);
            if found != expected.normalized() {
                return Err(SignInError::SchemeMismatch {
                    expected: expected.to_string(),
                    found,
                });
            }
        }
        if let Some(expected) = &self.domain {
            if !expected.as_str().eq_ignore_ascii_case(message.domain.as_str()) {
                return Err(SignInError::DomainMismatch {
                    expected: expected.to_string(),
                    found: message.domain.to_string(),
                });
            }
        }
        if let Some(expected) = &self.nonce {
            if *expected != message.nonce {
                return Err(SignInError::NonceMismatch {
                    expected: expected.to_string(),
                    found: message.nonce.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_window(&self, message: &Message) -> Result<(), SignInError> {
        if let Some(nbf) = &message.not_before {
            if self.at < nbf.instant() {
                return Err(SignInError::NotYetValid(nbf.to_string()));
            }
        }
        if let Some(exp) = &message.expiration_time {
            if self.at >= exp.instant() {
                return Err(SignInError::Expired(exp.to_string()));
            }
        }
        Ok(())
    }
}

/// Parses `text`, checks it against `expectations`, then asks `checker`
/// whether `signature` is valid over the text bytes.
///
/// Cheap field checks run before the signature check.
pub fn verify_sign_in<C>(
    text: &str,
    signature: &[u8],
    expectations: &SignInExpectations,
    checker: &C,
) -> Result<Message, SignInError>
where
    C: SignatureCheck + ?Sized,
{
    let message = Message::parse(text)?;
    expectations.check_fields(&message)?;
    expectations.check_window(&message)?;

    if !checker.verify(&message.address, &message.chain_id, text.as_bytes(), signature)? {
        tracing::warn!(address = %message.address, domain = %message.domain, "signature rejected");
        return Err(SignInError::InvalidSignature(message.address.to_string()));
    }

    tracing::info!(
        address = %message.address,
        domain = %message.domain,
        chain_id = %message.chain_id,
        "sign-in verified"
    );
    Ok(message)
}
