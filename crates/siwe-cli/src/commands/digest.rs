//! Digest command implementation.

use crate::input::{read_message, Limits};

pub fn run(input: Option<String>, limits: Limits) -> Result<(), Box<dyn std::error::Error>> {
    let message = read_message(input.as_deref(), limits)?;
    println!("0x{}", hex::encode(message.eip191_hash()));
    Ok(())
}
