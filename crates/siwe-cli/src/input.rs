//! Input helpers shared by commands.

use std::io::{self, Read};

use siwe_codec::Message;
use thiserror::Error;

/// How message text from files or stdin is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    /// Maximum message size in bytes.
    pub max_bytes: Option<usize>,
    /// Keep a trailing newline instead of dropping it.
    pub exact: bool,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
}

/// Reads a file, or stdin when no path is given.
pub fn read_text(input: Option<&str>) -> Result<String, InputError> {
    match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads and parses message text.
///
/// Text files conventionally end with a newline, which the grammar forbids;
/// one trailing newline is dropped unless `limits.exact` is set.
pub fn read_message(
    input: Option<&str>,
    limits: Limits,
) -> Result<Message, Box<dyn std::error::Error>> {
    let mut text = read_text(input)?;
    if !limits.exact && text.ends_with('\n') {
        text.pop();
    }
    let parsed = match limits.max_bytes {
        Some(max) => Message::parse_bounded(&text, max),
        None => Message::parse(&text),
    };
    Ok(parsed.map_err(|e| format!("Invalid message: {}", e))?)
}
