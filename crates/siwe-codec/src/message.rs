use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::errors::ParseError;
use crate::fields::{Address, ChainId, Domain, Nonce, RequestId, Scheme, Statement, Uri, Version};
use crate::grammar::{self, Field};
use crate::timestamp::Timestamp;

/// ERC-191 version `0x45` prefix applied by personal-sign primitives.
const EIP191_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// A sign-in request. Field order matches the text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Scheme of the requesting origin, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,
    /// Authority requesting the signature.
    pub domain: Domain,
    /// Account performing the sign-in.
    pub address: Address,
    /// Assertion the user signs, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<Statement>,
    /// Subject of the signing, usually the relying party's URI.
    pub uri: Uri,
    /// Message format version.
    pub version: Version,
    /// Chain on which the address and any contract account are resolved.
    pub chain_id: ChainId,
    /// Relying-party nonce that binds the signature to one session.
    pub nonce: Nonce,
    /// When the message was generated.
    pub issued_at: Timestamp,
    /// When the signed message stops being valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<Timestamp>,
    /// When the signed message becomes valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<Timestamp>,
    /// Relying-party request identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    /// Resources the user wishes to have resolved; empty means no `Resources:` block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Uri>,
}

impl Message {
    /// Builds a message with the required fields; optional fields start absent.
    pub fn new(
        domain: Domain,
        address: Address,
        uri: Uri,
        chain_id: ChainId,
        nonce: Nonce,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            scheme: None,
            domain,
            address,
            statement: None,
            uri,
            version: Version::V1,
            chain_id,
            nonce,
            issued_at,
            expiration_time: None,
            not_before: None,
            request_id: None,
            resources: Vec::new(),
        }
    }

    /// Parses message text. Any deviation from the grammar is an error.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        grammar::parse_message(text).map_err(|err| {
            tracing::debug!(error = %err, "message text rejected");
            err
        })
    }

    /// Parses message text after checking it against a size bound.
    pub fn parse_bounded(text: &str, max_bytes: usize) -> Result<Self, ParseError> {
        if text.len() > max_bytes {
            return Err(ParseError::TooLarge {
                size: text.len(),
                max: max_bytes,
            });
        }
        Self::parse(text)
    }

    /// Canonical text form; identical to `to_string()`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// True if `at` lies within `[not_before, expiration_time)`.
    pub fn valid_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let not_yet = self
            .not_before
            .as_ref()
            .is_some_and(|nbf| *at < nbf.instant());
        let expired = self
            .expiration_time
            .as_ref()
            .is_some_and(|exp| *at >= exp.instant());
        !not_yet && !expired
    }

    /// [`Message::valid_at`] against the system clock.
    pub fn valid_now(&self) -> bool {
        self.valid_at(&Utc::now())
    }

    /// Bytes a personal-sign primitive signs: prefix, decimal length, text.
    pub fn eip191_bytes(&self) -> Vec<u8> {
        let text = self.to_text();
        let mut bytes = Vec::with_capacity(EIP191_PREFIX.len() + 20 + text.len());
        bytes.extend_from_slice(EIP191_PREFIX.as_bytes());
        bytes.extend_from_slice(text.len().to_string().as_bytes());
        bytes.extend_from_slice(text.as_bytes());
        bytes
    }

    /// Keccak-256 of [`Message::eip191_bytes`].
    pub fn eip191_hash(&self) -> [u8; 32] {
        Keccak256::digest(self.eip191_bytes()).into()
    }

    /// Text value of a tagged line, `None` when the field is absent.
    pub(crate) fn tagged_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Uri => Some(self.uri.as_str()),
            Field::Version => Some(self.version.as_str()),
            Field::ChainId => Some(self.chain_id.as_str()),
            Field::Nonce => Some(self.nonce.as_str()),
            Field::IssuedAt => Some(self.issued_at.as_str()),
            Field::ExpirationTime => self.expiration_time.as_ref().map(Timestamp::as_str),
            Field::NotBefore => self.not_before.as_ref().map(Timestamp::as_str),
            Field::RequestId => self.request_id.as_ref().map(RequestId::as_str),
            Field::Scheme
            | Field::Domain
            | Field::Address
            | Field::Statement
            | Field::Resources => None,
        }
    }
}

impl std::str::FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
