//! Nonce command implementation.

use siwe_codec::Nonce;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", Nonce::generate());
    Ok(())
}
