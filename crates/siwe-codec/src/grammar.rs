//! Line grammar of the message text.
//!
//! ```text
//! [ scheme "://" ] domain " wants you to sign in with your Ethereum account:" LF
//! address LF
//! LF
//! [ statement LF ]
//! LF
//! "URI: " uri LF
//! "Version: " version LF
//! "Chain ID: " chain-id LF
//! "Nonce: " nonce LF
//! "Issued At: " issued-at
//! [ LF "Expiration Time: " expiration-time ]
//! [ LF "Not Before: " not-before ]
//! [ LF "Request ID: " request-id ]
//! [ LF "Resources:" 1*( LF "- " URI ) ]
//! ```
//!
//! The tagged lines are driven by [`TAGGED_RULES`]; the parser walks it once,
//! left to right, and never backtracks.

use std::fmt;

use crate::errors::{ParseError, StructureViolation};
use crate::fields::{Address, ChainId, Domain, Nonce, RequestId, Scheme, Statement, Uri, Version};
use crate::message::Message;
use crate::timestamp::Timestamp;
use crate::validation::ValidationError;

pub(crate) const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";
pub(crate) const RESOURCES_HEADER: &str = "Resources:";
pub(crate) const RESOURCE_PREFIX: &str = "- ";

/// Message fields, in the order they appear in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Optional URI scheme before the domain.
    Scheme,
    /// Requesting authority.
    Domain,
    /// Signing account address.
    Address,
    /// Optional human-readable statement.
    Statement,
    /// `URI:` line.
    Uri,
    /// `Version:` line.
    Version,
    /// `Chain ID:` line.
    ChainId,
    /// `Nonce:` line.
    Nonce,
    /// `Issued At:` line.
    IssuedAt,
    /// `Expiration Time:` line.
    ExpirationTime,
    /// `Not Before:` line.
    NotBefore,
    /// `Request ID:` line.
    RequestId,
    /// `Resources:` block.
    Resources,
}

impl Field {
    /// Human-readable field name.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Scheme => "scheme",
            Field::Domain => "domain",
            Field::Address => "address",
            Field::Statement => "statement",
            Field::Uri => "URI",
            Field::Version => "Version",
            Field::ChainId => "Chain ID",
            Field::Nonce => "Nonce",
            Field::IssuedAt => "Issued At",
            Field::ExpirationTime => "Expiration Time",
            Field::NotBefore => "Not Before",
            Field::RequestId => "Request ID",
            Field::Resources => "Resources",
        }
    }

    /// Literal that starts the field's line, for fields that have one.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Field::Uri => Some("URI: "),
            Field::Version => Some("Version: "),
            Field::ChainId => Some("Chain ID: "),
            Field::Nonce => Some("Nonce: "),
            Field::IssuedAt => Some("Issued At: "),
            Field::ExpirationTime => Some("Expiration Time: "),
            Field::NotBefore => Some("Not Before: "),
            Field::RequestId => Some("Request ID: "),
            Field::Resources => Some(RESOURCES_HEADER),
            Field::Scheme | Field::Domain | Field::Address | Field::Statement => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Required,
    Optional,
}

/// `key: value` lines in their fixed order.
pub(crate) const TAGGED_RULES: [(Field, Presence); 8] = [
    (Field::Uri, Presence::Required),
    (Field::Version, Presence::Required),
    (Field::ChainId, Presence::Required),
    (Field::Nonce, Presence::Required),
    (Field::IssuedAt, Presence::Required),
    (Field::ExpirationTime, Presence::Optional),
    (Field::NotBefore, Presence::Optional),
    (Field::RequestId, Presence::Optional),
];

struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            pos: 0,
        }
    }

    /// 1-based number of the next unread line.
    fn line_no(&self) -> usize {
        self.pos + 1
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = self.peek()?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn skip_blank(&mut self) -> bool {
        if self.peek() == Some("") {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_blank(&mut self) -> Result<(), ParseError> {
        if self.skip_blank() {
            Ok(())
        } else {
            Err(ParseError::Structure {
                line: self.line_no(),
                violation: StructureViolation::ExpectedBlankLine,
            })
        }
    }

    fn take_tagged(&mut self, tag: &str) -> Option<(usize, &'a str)> {
        let value = self.peek()?.strip_prefix(tag)?;
        self.pos += 1;
        Some((self.pos, value))
    }
}

#[derive(Default)]
struct Draft {
    uri: Option<Uri>,
    version: Option<Version>,
    chain_id: Option<ChainId>,
    nonce: Option<Nonce>,
    issued_at: Option<Timestamp>,
    expiration_time: Option<Timestamp>,
    not_before: Option<Timestamp>,
    request_id: Option<RequestId>,
}

impl Draft {
    fn assign(&mut self, field: Field, line: usize, value: &str) -> Result<(), ParseError> {
        let invalid = |source: ValidationError| ParseError::InvalidField {
            line,
            field,
            source,
        };
        match field {
            Field::Uri => self.uri = Some(Uri::parse(value).map_err(invalid)?),
            Field::Version => self.version = Some(value.parse().map_err(invalid)?),
            Field::ChainId => self.chain_id = Some(ChainId::parse(value).map_err(invalid)?),
            Field::Nonce => self.nonce = Some(Nonce::parse(value).map_err(invalid)?),
            Field::IssuedAt => self.issued_at = Some(Timestamp::parse(value).map_err(invalid)?),
            Field::ExpirationTime => {
                self.expiration_time = Some(Timestamp::parse(value).map_err(invalid)?)
            }
            Field::NotBefore => self.not_before = Some(Timestamp::parse(value).map_err(invalid)?),
            Field::RequestId => self.request_id = Some(RequestId::parse(value).map_err(invalid)?),
            Field::Scheme
            | Field::Domain
            | Field::Address
            | Field::Statement
            | Field::Resources => unreachable!("{field} is not a tagged line"),
        }
        Ok(())
    }
}

/// Classifies a line that matched no rule at its position.
fn unexpected(line: usize, text: &str) -> ParseError {
    let known = TAGGED_RULES
        .iter()
        .map(|(field, _)| *field)
        .chain(std::iter::once(Field::Resources))
        .find(|field| field.tag().is_some_and(|tag| text.starts_with(tag)));
    let violation = match known {
        Some(field) => StructureViolation::OutOfOrder(field),
        None => StructureViolation::UnexpectedLine(text.to_string()),
    };
    ParseError::Structure { line, violation }
}

/// A required rule did not match: either the field is absent (input ended or
/// a later field follows) or the line does not belong here at all.
fn missing(lines: &Lines<'_>, field: Field) -> ParseError {
    let Some(text) = lines.peek() else {
        return ParseError::MissingField(field);
    };
    let later_tag = TAGGED_RULES
        .iter()
        .map(|(f, _)| *f)
        .skip_while(|f| *f != field)
        .skip(1)
        .chain(std::iter::once(Field::Resources))
        .any(|f| f.tag().is_some_and(|tag| text.starts_with(tag)));
    if later_tag {
        ParseError::MissingField(field)
    } else {
        unexpected(lines.line_no(), text)
    }
}

pub(crate) fn parse_message(text: &str) -> Result<Message, ParseError> {
    let mut lines = Lines::new(text);

    let (line, header) = lines.next().ok_or(ParseError::MissingField(Field::Domain))?;
    let authority = header
        .strip_suffix(HEADER_SUFFIX)
        .ok_or(ParseError::Structure {
            line,
            violation: StructureViolation::HeaderLiteral,
        })?;
    let (scheme, domain) = match authority.split_once("://") {
        Some((scheme, domain)) => (Some(scheme), domain),
        None => (None, authority),
    };
    let scheme = scheme
        .map(Scheme::parse)
        .transpose()
        .map_err(|source| ParseError::InvalidField {
            line,
            field: Field::Scheme,
            source,
        })?;
    let domain = Domain::parse(domain).map_err(|source| ParseError::InvalidField {
        line,
        field: Field::Domain,
        source,
    })?;

    let (line, address) = lines
        .next()
        .ok_or(ParseError::MissingField(Field::Address))?;
    let address = Address::parse(address).map_err(|source| ParseError::InvalidField {
        line,
        field: Field::Address,
        source,
    })?;
    lines.expect_blank()?;

    // Either `statement LF LF` or a lone blank line. A third blank line is
    // a zero-length statement, which is kept as no statement.
    let statement = match lines.peek() {
        Some("") => {
            lines.skip_blank();
            lines.skip_blank();
            None
        }
        Some(text) => {
            let line = lines.line_no();
            let statement = Statement::parse(text).map_err(|source| ParseError::InvalidField {
                line,
                field: Field::Statement,
                source,
            })?;
            lines.pos += 1;
            lines.expect_blank()?;
            Some(statement)
        }
        None => None,
    };

    let mut draft = Draft::default();
    for (field, presence) in TAGGED_RULES {
        let Some(tag) = field.tag() else { continue };
        match lines.take_tagged(tag) {
            Some((line, value)) => draft.assign(field, line, value)?,
            None if presence == Presence::Required => return Err(missing(&lines, field)),
            None => {}
        }
    }

    let mut resources = Vec::new();
    if lines.peek() == Some(RESOURCES_HEADER) {
        let header_line = lines.line_no();
        lines.pos += 1;
        while let Some((line, value)) = lines.take_tagged(RESOURCE_PREFIX) {
            let uri = Uri::parse(value).map_err(|source| ParseError::InvalidField {
                line,
                field: Field::Resources,
                source,
            })?;
            resources.push(uri);
        }
        if resources.is_empty() {
            return Err(ParseError::Structure {
                line: header_line,
                violation: StructureViolation::EmptyResources,
            });
        }
    }

    if let Some(text) = lines.peek() {
        let line = lines.line_no();
        return Err(if text.is_empty() {
            ParseError::Structure {
                line,
                violation: StructureViolation::TrailingContent,
            }
        } else {
            unexpected(line, text)
        });
    }

    Ok(Message {
        scheme,
        domain,
        address,
        statement,
        uri: draft.uri.ok_or(ParseError::MissingField(Field::Uri))?,
        version: draft
            .version
            .ok_or(ParseError::MissingField(Field::Version))?,
        chain_id: draft
            .chain_id
            .ok_or(ParseError::MissingField(Field::ChainId))?,
        nonce: draft.nonce.ok_or(ParseError::MissingField(Field::Nonce))?,
        issued_at: draft
            .issued_at
            .ok_or(ParseError::MissingField(Field::IssuedAt))?,
        expiration_time: draft.expiration_time,
        not_before: draft.not_before,
        request_id: draft.request_id,
        resources,
    })
}
