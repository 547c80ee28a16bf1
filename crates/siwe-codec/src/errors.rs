use thiserror::Error;

use crate::grammar::Field;
use crate::validation::ValidationError;

/// Ways the line structure of a message can deviate from the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureViolation {
    /// The first line does not end with the sign-in request literal.
    #[error("header must end with \" wants you to sign in with your Ethereum account:\"")]
    HeaderLiteral,
    /// A blank separator line was expected.
    #[error("expected a blank line")]
    ExpectedBlankLine,
    /// A known field appears after a field that must follow it.
    #[error("{0} is out of order")]
    OutOfOrder(Field),
    /// A line matches no grammar rule at this position.
    #[error("unexpected line {0:?}")]
    UnexpectedLine(String),
    /// `Resources:` is not followed by any `- ` entry.
    #[error("Resources: must be followed by at least one \"- \" entry")]
    EmptyResources,
    /// Input continues after the last field, including a trailing line feed.
    #[error("unexpected content after the last field")]
    TrailingContent,
}

/// Errors produced when parsing message text. Parsing is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input exceeds the caller's size bound.
    #[error("message is {size} bytes, limit is {max}")]
    TooLarge {
        /// Input size in bytes.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// Grammar mismatch: literal text, blank lines, or line ordering.
    #[error("line {line}: {violation}")]
    Structure {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        violation: StructureViolation,
    },
    /// A required field line is absent.
    #[error("missing required field {0}")]
    MissingField(Field),
    /// A field line is well formed but its value is invalid.
    #[error("line {line}: invalid {field}: {source}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Field whose value failed validation.
        field: Field,
        /// Underlying validation failure.
        #[source]
        source: ValidationError,
    },
}

impl ParseError {
    /// The field a value or presence error refers to.
    pub fn field(&self) -> Option<Field> {
        match self {
            ParseError::MissingField(field) | ParseError::InvalidField { field, .. } => {
                Some(*field)
            }
            ParseError::Structure {
                violation: StructureViolation::OutOfOrder(field),
                ..
            } => Some(*field),
            _ => None,
        }
    }
}
