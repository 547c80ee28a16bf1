//! Checksum command implementation.

use siwe_codec::Address;

pub fn run(address: String, verify: bool) -> Result<(), Box<dyn std::error::Error>> {
    let address = Address::parse(address).map_err(|e| format!("Invalid address: {}", e))?;
    println!("{}", address.to_checksum());
    if verify {
        address.verify_checksum()?;
    }
    Ok(())
}
