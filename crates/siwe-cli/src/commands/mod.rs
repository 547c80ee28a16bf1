//! Command implementations.

pub mod check_origin;
pub mod checksum;
pub mod create;
pub mod digest;
pub mod nonce;
pub mod parse;
pub mod render;
