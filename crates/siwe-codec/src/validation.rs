use thiserror::Error;

/// Validation errors for message field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a numeric component exceeds its bounds.
    #[error("{field} ({value}) is out of bounds")]
    OutOfBounds {
        /// Field name that is out of bounds.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a value is shorter than its minimum length.
    #[error("{field} must be at least {min} characters, got {actual}")]
    TooShort {
        /// Field name that is too short.
        field: &'static str,
        /// Minimum length.
        min: usize,
        /// Actual length.
        actual: usize,
    },
    /// When a value must not be empty.
    #[error("{field} must not be empty")]
    Empty {
        /// Field name that was empty.
        field: &'static str,
    },
    /// When a single-line value contains a line break.
    #[error("{field} must not contain a line break")]
    LineBreak {
        /// Field name that contained the line break.
        field: &'static str,
    },
    /// When a value names an unsupported revision of the format.
    #[error("{field} '{value}' is not supported")]
    Unsupported {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a timestamp is not a valid RFC 3339 date-time.
    #[error("'{value}' is not an RFC 3339 date-time: {reason}")]
    InvalidTimestamp {
        /// Offending value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// When an address does not carry its EIP-55 checksum casing.
    #[error("address {found} does not match checksum encoding {expected}")]
    ChecksumMismatch {
        /// Checksum-encoded form of the address.
        expected: String,
        /// Address as given.
        found: String,
    },
}
