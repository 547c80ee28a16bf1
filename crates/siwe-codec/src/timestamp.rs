use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

const DATE_TIME_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[Tt][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:[Zz]|[+\-][0-9]{2}:[0-9]{2})$";

/// RFC 3339 `date-time`.
///
/// The original text is kept so rendering reproduces the signed bytes exactly;
/// comparisons against the clock use the parsed instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    text: String,
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Parses a validated timestamp.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let text = value.into();
        let re = PATTERN.get_or_init(|| Regex::new(DATE_TIME_PATTERN).expect("invalid regex"));
        if !re.is_match(&text) {
            return Err(ValidationError::InvalidTimestamp {
                value: text,
                reason: "expected YYYY-MM-DDTHH:MM:SS[.frac](Z|+hh:mm)".to_string(),
            });
        }
        match DateTime::parse_from_rfc3339(&text) {
            Ok(instant) => Ok(Self { text, instant }),
            Err(err) => Err(ValidationError::InvalidTimestamp {
                value: text,
                reason: err.to_string(),
            }),
        }
    }

    /// Formats a UTC instant with millisecond precision and a `Z` suffix.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self {
            text: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant: instant.fixed_offset(),
        }
    }

    /// Current time.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// The parsed instant.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// The timestamp as it appears in message text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Timestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.text
    }
}
