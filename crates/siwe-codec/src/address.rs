//! EIP-55 mixed-case checksum encoding.
//!
//! The codec accepts addresses in any casing; checking the checksum is a
//! separate step callers opt into.

use sha3::{Digest, Keccak256};

use crate::fields::Address;
use crate::validation::ValidationError;

impl Address {
    /// Returns the EIP-55 checksum encoding of this address.
    pub fn to_checksum(&self) -> String {
        let lower = self.as_str()[2..].to_ascii_lowercase();
        let hash = hex::encode(Keccak256::digest(lower.as_bytes()));

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (c, h) in lower.chars().zip(hash.chars()) {
            if c.is_ascii_alphabetic() && h >= '8' {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// True if the address is written in its checksum encoding.
    pub fn is_checksummed(&self) -> bool {
        self.as_str() == self.to_checksum()
    }

    /// Fails unless the address carries its checksum casing.
    pub fn verify_checksum(&self) -> Result<(), ValidationError> {
        let expected = self.to_checksum();
        if self.as_str() != expected {
            return Err(ValidationError::ChecksumMismatch {
                expected,
                found: self.as_str().to_string(),
            });
        }
        Ok(())
    }
}
