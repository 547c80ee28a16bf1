//! Render command implementation.

use siwe_codec::Message;

use crate::input::read_text;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let json_str = read_text(input.as_deref())?;
    let message: Message =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid message JSON: {}", e))?;
    println!("{}", message);
    Ok(())
}
