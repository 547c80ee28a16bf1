//! Message model and codec for Sign-In with Ethereum (EIP-4361).
//!
//! The textual message is the exact payload a wallet signs, so the codec is
//! strict in both directions: parsing accepts only text matching the grammar
//! line for line, and rendering reproduces that text byte for byte. For every
//! valid message `m`, `Message::parse(&m.to_string()) == Ok(m)`.
//!
//! Field values are validated newtypes; once a [`Message`] exists, its
//! invariants hold by construction.
//!
#![deny(missing_docs)]

/// EIP-55 checksum encoding for addresses.
pub mod address;
/// Parse error types.
pub mod errors;
/// Validated field newtypes.
pub mod fields;
/// Line grammar and the single-pass parser.
pub mod grammar;
/// The message value object.
pub mod message;
/// Canonical text rendering.
pub mod render;
/// RFC 3339 timestamps.
pub mod timestamp;
/// Validation errors for field values.
pub mod validation;

pub use errors::{ParseError, StructureViolation};
pub use fields::{Address, ChainId, Domain, Nonce, RequestId, Scheme, Statement, Uri, Version};
pub use grammar::Field;
pub use message::Message;
pub use timestamp::Timestamp;
pub use validation::ValidationError;
